// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use super::{non_negative, single_output};
use crate::config::{Attribute, ConfigurationModel, Schema};
use crate::data::Data;
use crate::journal::Context;
use crate::modules::{Declaration, GeneratorArgs, Module, ModuleDefinition, OutputMessage};
use crate::streams::Observable;

pub const TYPE_ID: &str = "timer";

pub fn module() -> Module {
    Module::new(
        Declaration::new(TYPE_ID, "Emits 0, 1, 2, ... once per period; `count` 0 never stops")
            .with_tags(&["reactive", "producer"]),
        |_| ModuleDefinition {
            configuration: ConfigurationModel::new([
                ("period_ms", Schema::from(Attribute::integer(1000).with_min(1))),
                ("count", Schema::from(Attribute::integer(0).with_min(0))),
            ]),
            inputs: vec![],
            outputs: Box::new(|args: GeneratorArgs| {
                let period = Duration::from_millis(non_negative(&args.configuration, "period_ms").max(1));
                let count = Some(non_negative(&args.configuration, "count")).filter(|count| *count > 0);
                let ticks = Observable::timer(period, count).map(|tick: &u64| OutputMessage {
                    data: Data::from(*tick as i64),
                    context: Context::detached(format!("tick {}", tick)),
                });
                single_output(ticks)
            }),
        },
    )
}
