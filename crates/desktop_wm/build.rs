use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_MANIFESTS: [&str; 8] = [
    "internet-explorer",
    "minesweeper",
    "my-computer",
    "my-chart",
    "notepad",
    "winamp",
    "paint",
    "error-box",
];

const CHROME_BUTTONS: [&str; 3] = ["minimize", "maximize", "close"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowSize {
    width: i32,
    height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WindowOffset {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChromeManifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    invisible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buttons: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_in_taskbar: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppManifest {
    #[serde(skip_serializing)]
    schema_version: u32,
    app_kind: String,
    title: String,
    icon: String,
    resizable: bool,
    allows_multiple_instances: bool,
    #[serde(default)]
    centered: bool,
    #[serde(default)]
    open_on_boot: bool,
    default_size: WindowSize,
    default_offset: WindowOffset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boot_size: Option<WindowSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boot_offset: Option<WindowOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chrome: Option<ChromeManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum IconTarget {
    App(String),
    External(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct IconManifest {
    id: u32,
    title: String,
    icon: String,
    target: IconTarget,
}

#[derive(Debug, Clone, Deserialize)]
struct IconManifestFile {
    schema_version: u32,
    icons: Vec<IconManifest>,
}

fn read_manifest<T: for<'de> Deserialize<'de>>(path: &Path) -> T {
    println!("cargo:rerun-if-changed={}", path.display());
    let raw = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    toml::from_str(&raw).unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()))
}

fn load_app_manifests(root: &Path) -> Vec<AppManifest> {
    let mut seen = HashSet::new();
    let mut manifests = Vec::new();
    for name in APP_MANIFESTS {
        let path = root.join("manifests").join("apps").join(format!("{name}.toml"));
        let manifest: AppManifest = read_manifest(&path);
        if manifest.schema_version != 1 {
            panic!(
                "manifest schema mismatch in {}: expected 1 found {}",
                path.display(),
                manifest.schema_version
            );
        }
        if manifest.app_kind != name {
            panic!(
                "manifest {} declares app_kind `{}`",
                path.display(),
                manifest.app_kind
            );
        }
        if manifest.title.trim().is_empty() {
            panic!("manifest {} has an empty title", path.display());
        }
        if manifest.default_size.width < 0 || manifest.default_size.height < 0 {
            panic!("manifest {} has a negative default size", path.display());
        }
        if !manifest.open_on_boot
            && (manifest.boot_size.is_some() || manifest.boot_offset.is_some())
        {
            panic!("manifest {} sets boot geometry without open_on_boot", path.display());
        }
        if let Some(size) = &manifest.boot_size {
            if size.width < 0 || size.height < 0 {
                panic!("manifest {} has a negative boot size", path.display());
            }
        }
        if let Some(buttons) = manifest.chrome.as_ref().and_then(|c| c.buttons.as_ref()) {
            if let Some(bad) = buttons.iter().find(|b| !CHROME_BUTTONS.contains(&b.as_str())) {
                panic!("manifest {} names unknown button `{bad}`", path.display());
            }
        }
        if !seen.insert(manifest.app_kind.clone()) {
            panic!("duplicate app kind `{}`", manifest.app_kind);
        }
        manifests.push(manifest);
    }
    manifests
}

fn load_icon_manifest(root: &Path) -> Vec<IconManifest> {
    let path = root.join("manifests").join("desktop_icons.toml");
    let file: IconManifestFile = read_manifest(&path);
    if file.schema_version != 1 {
        panic!(
            "icon manifest schema mismatch: expected 1 found {}",
            file.schema_version
        );
    }
    let mut ids = HashSet::new();
    for icon in &file.icons {
        if !ids.insert(icon.id) {
            panic!("duplicate desktop icon id {}", icon.id);
        }
        if let IconTarget::App(kind) = &icon.target {
            if !APP_MANIFESTS.contains(&kind.as_str()) {
                panic!("desktop icon {} targets unknown app `{kind}`", icon.id);
            }
        }
    }
    file.icons
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let apps = load_app_manifests(&crate_root);
    let icons = load_icon_manifest(&crate_root);

    let apps_json = serde_json::to_string_pretty(&apps).expect("serialize app catalog");
    let icons_json = serde_json::to_string_pretty(&icons).expect("serialize icon catalog");
    let generated = format!(
        "/// Build-time generated launch spec catalog JSON.\n\
pub const APP_CATALOG_JSON: &str = r##\"{apps_json}\"##;\n\
/// Build-time generated desktop icon catalog JSON.\n\
pub const DESKTOP_ICONS_JSON: &str = r##\"{icons_json}\"##;\n"
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
