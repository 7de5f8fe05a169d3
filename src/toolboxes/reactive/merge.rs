// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{forwarded, free_input, single_output, FIRST_INPUT_SLOT, SECOND_INPUT_SLOT};
use crate::config::ConfigurationModel;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition};

pub const TYPE_ID: &str = "merge";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Forwards the messages of both inputs in arrival order")
            .with_tags(&["reactive", "combination"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::empty(),
            inputs: vec![
                free_input(FIRST_INPUT_SLOT, "first stream"),
                free_input(SECOND_INPUT_SLOT, "second stream"),
            ],
            outputs: Box::new(|args: GeneratorArgs| {
                let merged = args.input(FIRST_INPUT_SLOT).merge(&args.input(SECOND_INPUT_SLOT));
                single_output(merged.map(forwarded))
            }),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use crate::modules::{ForwardArgs, InputMessage};
    use crate::toolboxes::reactive::test_support::record;

    #[test]
    fn test_merge_interleaves_inputs() {
        let instance = module().build(ForwardArgs::default());
        let recorded = record(&instance);
        let first = instance.input_slot(FIRST_INPUT_SLOT).unwrap();
        let second = instance.input_slot(SECOND_INPUT_SLOT).unwrap();

        first.send(InputMessage::new(1));
        second.send(InputMessage::new("two"));
        first.send(InputMessage::new(3));

        assert_eq!(recorded.data(), vec![Data::from(1), Data::from("two"), Data::from(3)]);
    }
}
