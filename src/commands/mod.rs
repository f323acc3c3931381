// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod records;
pub mod summary;
pub mod presets;
pub mod importer;
pub mod exporter;
pub mod session;
pub mod doctor;
