use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_embed::Embed;

use crate::content::parse_plan;
use crate::lesson::plan::LessonPlan;

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

/// Names of the lessons shipped with the binary, sorted.
pub fn available_lessons() -> Vec<String> {
    let mut names: Vec<String> = LessonAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

pub fn load_bundled(name: &str) -> Result<LessonPlan> {
    let file = LessonAssets::get(&format!("{name}.json"))
        .with_context(|| format!("no bundled lesson named `{name}`"))?;
    let text = std::str::from_utf8(file.data.as_ref())
        .with_context(|| format!("bundled lesson `{name}` is not UTF-8"))?;
    parse_plan(text).with_context(|| format!("bundled lesson `{name}` is invalid"))
}

pub fn load_file(path: &Path) -> Result<LessonPlan> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read lesson plan {}", path.display()))?;
    parse_plan(&text).with_context(|| format!("lesson plan {} is invalid", path.display()))
}
