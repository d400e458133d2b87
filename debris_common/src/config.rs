/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// RON config file lookup.
///
/// Configs are plain serde structs stored as `*.ron` files. They are looked up in this order:
///   1. `$DEBRIS_CONFIG_DIR/❬crate❭/❬file❭` and `$DEBRIS_CONFIG_DIR/❬file❭`
///   2. `~/.debris/configs/❬crate❭/❬file❭`
///   3. `./configs/❬crate❭/❬file❭` and `./configs/❬file❭` (relative to the current working dir)
///   4. `❬crate-manifest-dir❭/configs/❬file❭` - the example configs that come with the source repo
///
/// Crates that define configs expand `define_load_config!{}` at their top level, which provides a
/// `load_config(filename)` function bound to the crate name and manifest dir.

use std::{env, fs, path::{Path,PathBuf}};
use serde::Deserialize;
use crate::errors::{DebrisCommonError, Result};

pub const CONFIGS: &'static str = "configs";
pub const CONFIG_DIR_ENV: &'static str = "DEBRIS_CONFIG_DIR";

pub fn find_config_file (resource_crate: &str, manifest_dir: &str, filename: &str) -> Option<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV) {
        let dir = PathBuf::from(dir);
        if let Some(path) = find_in_dir( &dir, resource_crate, filename) { return Some(path) }
    }

    if let Ok(usr_home) = env::var("HOME") {
        let dir = Path::new(usr_home.as_str()).join(".debris").join(CONFIGS);
        if let Some(path) = find_in_dir( &dir, resource_crate, filename) { return Some(path) }
    }

    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_in_dir( &cwd.join(CONFIGS), resource_crate, filename) { return Some(path) }
    }

    let path = Path::new(manifest_dir).join(CONFIGS).join(filename);
    if path.is_file() { Some(path) } else { None }
}

fn find_in_dir (dir: &Path, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    let path = dir.join(resource_crate).join(filename);
    if path.is_file() { return Some(path) }

    let path = dir.join(filename);
    if path.is_file() { return Some(path) }

    None
}

pub fn load_config_file<C> (path: impl AsRef<Path>) -> Result<C> where C: for<'a> Deserialize<'a> {
    let data = fs::read_to_string(path)?;
    Ok( ron::from_str(&data)? )
}

pub fn load_crate_config<C> (resource_crate: &str, manifest_dir: &str, filename: &str) -> Result<C> where C: for<'a> Deserialize<'a> {
    match find_config_file( resource_crate, manifest_dir, filename) {
        Some(path) => load_config_file(path),
        None => Err( DebrisCommonError::ConfigNotFoundError(filename.to_string()) )
    }
}

/// this is the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        /// load a RON config file using the `debris_common::config` lookup mechanism
        pub fn load_config<C> (filename: &str) -> debris_common::errors::Result<C> where C: for <'a> serde::Deserialize<'a> {
            debris_common::config::load_crate_config( env!("CARGO_PKG_NAME"), env!("CARGO_MANIFEST_DIR"), filename)
        }
    }
}
