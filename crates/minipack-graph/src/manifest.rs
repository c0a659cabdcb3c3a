//! App manifest (`app.json`) and page/component descriptors.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::runtime::Runtime;

/// Normalized app manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppManifest {
    pub pages: Vec<String>,
    pub tab_bar: Option<TabBar>,
    pub sub_packages: Vec<SubPackageDecl>,
    /// Components registered globally by the app
    pub using_components: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabBar {
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub list: Vec<TabBarItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabBarItem {
    #[serde(default)]
    pub page_path: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub selected_icon_path: Option<String>,
}

impl TabBarItem {
    /// Icon references in declaration order.
    pub fn icons(&self) -> impl Iterator<Item = &str> {
        self.icon_path
            .iter()
            .chain(self.selected_icon_path.iter())
            .map(String::as_str)
            .filter(|icon| !icon.is_empty())
    }
}

/// One `subpackages` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPackageDecl {
    pub root: String,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub independent: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl SubPackageDecl {
    /// Registry key: the declared name, else the root.
    pub fn package_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.root)
    }
}

/// Wire shape of `app.json`. Either spelling of the sub-package list may appear.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAppManifest {
    #[serde(default)]
    pages: Vec<String>,
    #[serde(default)]
    tab_bar: Option<TabBar>,
    #[serde(default, rename = "subpackages")]
    subpackages_lower: Option<Vec<SubPackageDecl>>,
    #[serde(default, rename = "subPackages")]
    subpackages_camel: Option<Vec<SubPackageDecl>>,
    #[serde(default)]
    using_components: IndexMap<String, String>,
}

impl From<RawAppManifest> for AppManifest {
    fn from(raw: RawAppManifest) -> Self {
        Self {
            pages: raw.pages,
            tab_bar: raw.tab_bar,
            sub_packages: raw
                .subpackages_lower
                .or(raw.subpackages_camel)
                .unwrap_or_default(),
            using_components: raw.using_components,
        }
    }
}

impl AppManifest {
    pub fn parse(path: &Path, content: &[u8]) -> Result<Self> {
        let raw: RawAppManifest = parse_json(path, content)?;
        Ok(raw.into())
    }

    pub fn load(runtime: &dyn Runtime, path: &Path) -> Result<Self> {
        Self::parse(path, &read_descriptor(runtime, path)?)
    }

    pub fn has_custom_tab_bar(&self) -> bool {
        self.tab_bar.as_ref().is_some_and(|tab_bar| tab_bar.custom)
    }

    pub fn tab_bar_icons(&self) -> impl Iterator<Item = &str> {
        self.tab_bar
            .iter()
            .flat_map(|tab_bar| tab_bar.list.iter())
            .flat_map(TabBarItem::icons)
    }
}

/// Sibling JSON of a page or component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Alias -> reference, in document order
    #[serde(default)]
    pub using_components: IndexMap<String, String>,
}

impl ComponentDescriptor {
    pub fn parse(path: &Path, content: &[u8]) -> Result<Self> {
        parse_json(path, content)
    }

    pub fn load(runtime: &dyn Runtime, path: &Path) -> Result<Self> {
        Self::parse(path, &read_descriptor(runtime, path)?)
    }
}

/// `<dir>/<stem>.json` for an entry file.
pub fn descriptor_path(entry: &Path) -> PathBuf {
    entry.with_extension("json")
}

fn read_descriptor(runtime: &dyn Runtime, path: &Path) -> Result<Vec<u8>> {
    runtime.read_file(path).map_err(|e| GraphError::Manifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, content: &[u8]) -> Result<T> {
    serde_json::from_slice(content).map_err(|e| GraphError::Manifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
