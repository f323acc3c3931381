// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::presets::PRESETS;
use crate::utils::pretty_table;

pub fn handle() {
    let rows: Vec<Vec<String>> = PRESETS
        .iter()
        .map(|p| {
            vec![
                p.key.to_string(),
                p.label.to_string(),
                p.kind.label().to_string(),
                p.category.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Key", "Button", "Tipo", "Categoria"], rows));
}
