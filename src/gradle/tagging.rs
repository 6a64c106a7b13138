//! Project classification

use crate::models::records::{DependencyRecord, ProjectTag};

const ANDROID_BUILD_GROUP: &str = "com.android.tools.build";

/// Android when the root build script depends on the Android Gradle plugin
pub fn tag_project<'a>(root_dependencies: impl IntoIterator<Item = &'a DependencyRecord>) -> ProjectTag {
    if root_dependencies
        .into_iter()
        .any(|d| d.group_id.contains(ANDROID_BUILD_GROUP))
    {
        ProjectTag::Android
    } else {
        ProjectTag::Other
    }
}
