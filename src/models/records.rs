//! Fact records extracted from Gradle build files

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::gradle::vocabulary::ConfigurationKind;

/// A declared external dependency
///
/// Two records are the same dependency when group, artifact and configuration
/// agree. The version is carried along but does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub configuration: Option<ConfigurationKind>,
    /// Declared inside an `allprojects` block
    pub declared_globally: bool,
}

impl DependencyRecord {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            configuration: None,
            declared_globally: false,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version.filter(|v| !v.is_empty());
        self
    }

    pub fn with_configuration(mut self, configuration: ConfigurationKind) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn declared_globally(mut self, global: bool) -> Self {
        self.declared_globally = global;
        self
    }

    /// `group:artifact`
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Ordering key used when records are written out
    pub fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.group_id,
            &self.artifact_id,
            self.configuration.map(|c| c.key()).unwrap_or(""),
            self.version.as_deref().unwrap_or(""),
        )
    }
}

impl PartialEq for DependencyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.configuration == other.configuration
    }
}

impl Eq for DependencyRecord {}

impl Hash for DependencyRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.artifact_id.hash(state);
        self.configuration.hash(state);
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(config) = self.configuration {
            write!(f, "{} ", config)?;
        }
        write!(f, "{}", self.coordinate())?;
        if let Some(version) = &self.version {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

/// A declared or applied Gradle plugin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginRecord {
    pub plugin_id: String,
    pub version: Option<String>,
    pub applied: bool,
    pub args: BTreeSet<String>,
    pub declared_globally: bool,
}

impl PluginRecord {
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            version: None,
            applied: true,
            args: BTreeSet::new(),
            declared_globally: false,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version.filter(|v| !v.is_empty());
        self
    }

    pub fn with_applied(mut self, applied: bool) -> Self {
        self.applied = applied;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.insert(arg.into());
        self
    }

    pub fn declared_globally(mut self, global: bool) -> Self {
        self.declared_globally = global;
        self
    }
}

impl fmt::Display for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plugin_id)?;
        if let Some(version) = &self.version {
            write!(f, " {}", version)?;
        }
        if !self.applied {
            write!(f, " (not applied)")?;
        }
        Ok(())
    }
}

/// One entry of a `gradle.properties` file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradleProperty {
    pub key: String,
    pub value: String,
}

/// Coarse project classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTag {
    Android,
    Other,
}

impl fmt::Display for ProjectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectTag::Android => write!(f, "android"),
            ProjectTag::Other => write!(f, "other"),
        }
    }
}
