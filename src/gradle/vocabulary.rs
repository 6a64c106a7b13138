//! Configuration keywords recognised in `dependencies { }` blocks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group id implied by the `kotlin("x")` shorthand
pub const KOTLIN_GROUP: &str = "org.jetbrains.kotlin";

/// Artifact prefix implied by the `kotlin("x")` shorthand
pub const KOTLIN_ARTIFACT_PREFIX: &str = "kotlin-";

/// Dependency configurations, in the order they are offered to the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfigurationKind {
    #[serde(rename = "kapt")]
    Kapt,
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "classpath")]
    Classpath,
    #[serde(rename = "compileOnly")]
    CompileOnly,
    #[serde(rename = "runtimeOnly")]
    RuntimeOnly,
    #[serde(rename = "compile")]
    Compile,
    #[serde(rename = "implementation")]
    Implementation,
    #[serde(rename = "annotationProcessor")]
    AnnotationProcessor,
    #[serde(rename = "testImplementation")]
    TestImplementation,
    #[serde(rename = "testRuntimeOnly")]
    TestRuntimeOnly,
    #[serde(rename = "testRuntime")]
    TestRuntime,
    #[serde(rename = "testCompile")]
    TestCompile,
    #[serde(rename = "androidTestImplementation")]
    AndroidTestImplementation,
}

/// The default vocabulary
pub static CONFIGURATIONS: &[ConfigurationKind] = &[
    ConfigurationKind::Kapt,
    ConfigurationKind::Api,
    ConfigurationKind::Classpath,
    ConfigurationKind::CompileOnly,
    ConfigurationKind::RuntimeOnly,
    ConfigurationKind::Compile,
    ConfigurationKind::Implementation,
    ConfigurationKind::AnnotationProcessor,
    ConfigurationKind::TestImplementation,
    ConfigurationKind::TestRuntimeOnly,
    ConfigurationKind::TestRuntime,
    ConfigurationKind::TestCompile,
    ConfigurationKind::AndroidTestImplementation,
];

impl ConfigurationKind {
    /// Keyword as written in build scripts
    pub fn key(&self) -> &'static str {
        match self {
            ConfigurationKind::Kapt => "kapt",
            ConfigurationKind::Api => "api",
            ConfigurationKind::Classpath => "classpath",
            ConfigurationKind::CompileOnly => "compileOnly",
            ConfigurationKind::RuntimeOnly => "runtimeOnly",
            ConfigurationKind::Compile => "compile",
            ConfigurationKind::Implementation => "implementation",
            ConfigurationKind::AnnotationProcessor => "annotationProcessor",
            ConfigurationKind::TestImplementation => "testImplementation",
            ConfigurationKind::TestRuntimeOnly => "testRuntimeOnly",
            ConfigurationKind::TestRuntime => "testRuntime",
            ConfigurationKind::TestCompile => "testCompile",
            ConfigurationKind::AndroidTestImplementation => "androidTestImplementation",
        }
    }

    /// Case-insensitive lookup of a keyword
    pub fn from_key(key: &str) -> Option<ConfigurationKind> {
        CONFIGURATIONS
            .iter()
            .copied()
            .find(|kind| kind.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for ConfigurationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_ignores_case() {
        assert_eq!(ConfigurationKind::from_key("implementation"), Some(ConfigurationKind::Implementation));
        assert_eq!(ConfigurationKind::from_key("TESTIMPLEMENTATION"), Some(ConfigurationKind::TestImplementation));
        assert_eq!(ConfigurationKind::from_key("debugImplementation"), None);
    }

    #[test]
    fn test_vocabulary_keys_round_trip() {
        for kind in CONFIGURATIONS {
            assert_eq!(ConfigurationKind::from_key(kind.key()), Some(*kind));
        }
        assert_eq!(CONFIGURATIONS.len(), 13);
    }

    #[test]
    fn test_serde_uses_build_script_spelling() {
        let json = serde_json::to_string(&ConfigurationKind::CompileOnly).unwrap();
        assert_eq!(json, "\"compileOnly\"");
    }
}
