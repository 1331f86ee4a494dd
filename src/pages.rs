//! Built-in page generator.
//!
//! A deliberately small [`DocGenerator`]: it reads just enough of a spec (title, description,
//! tags and the operations under `paths`) to decide which pages to write and what to call
//! them. Rendering the operations themselves is left to the `APIPage` component of the site,
//! so nothing here interprets schemas.

use crate::error::{PipelineError, Result};
use crate::generator::{
    DocGenerator, FrontMatter, GenerationRequest, Granularity, MetadataHook, PageInfo,
};
use log::debug;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the site component that renders operations.
pub const API_PAGE_COMPONENT: &str = "APIPage";

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Writes `.mdx`-style pages that hand the spec to the site's `APIPage` component.
#[derive(Debug, Clone)]
pub struct OpenApiPageGenerator {
    extension: String,
}

impl OpenApiPageGenerator {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl Default for OpenApiPageGenerator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_EXTENSION)
    }
}

#[derive(Debug, Clone, Serialize)]
struct OperationRef {
    path: String,
    method: String,
}

#[derive(Debug, Clone)]
struct Operation {
    path: String,
    method: String,
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
}

impl Operation {
    fn reference(&self) -> OperationRef {
        OperationRef {
            path: self.path.clone(),
            method: self.method.clone(),
        }
    }

    fn title(&self) -> String {
        self.summary
            .clone()
            .or_else(|| self.operation_id.clone())
            .unwrap_or_else(|| format!("{} {}", self.method.to_uppercase(), self.path))
    }

    fn page_name(&self) -> String {
        match &self.operation_id {
            Some(id) => slugify(id),
            None => slugify(&format!("{} {}", self.method, self.path)),
        }
    }
}

#[derive(Debug, Clone)]
struct SpecSummary {
    title: String,
    description: Option<String>,
    /// Tag name and description, in declaration order
    tags: Vec<(String, Option<String>)>,
    operations: Vec<Operation>,
}

/// A page to write: its file name without extension, metadata and the operations it shows.
struct PagePlan<'a> {
    name: String,
    info: PageInfo,
    operations: Vec<&'a Operation>,
}

impl DocGenerator for OpenApiPageGenerator {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        front_matter: &MetadataHook<'_>,
    ) -> Result<Vec<PathBuf>> {
        let summary = load_spec(request.input)?;
        debug!(
            "{}: {} operations, {} tags",
            request.input.display(),
            summary.operations.len(),
            summary.tags.len()
        );

        let stem = request
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string());
        let plans = plan_pages(&summary, &stem, request.granularity);

        let mut written = Vec::with_capacity(plans.len());
        let mut used_names = HashSet::new();
        for plan in plans {
            let name = unique_name(&plan.name, &mut used_names);
            let content = render_page(
                &front_matter(&plan.info),
                request.document_path,
                &plan.operations,
            )?;

            let path = request
                .output_dir
                .join(format!("{}.{}", name, self.extension));
            fs::write(&path, content).map_err(|e| PipelineError::io(&path, e))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

fn plan_pages<'a>(
    summary: &'a SpecSummary,
    stem: &str,
    granularity: Granularity,
) -> Vec<PagePlan<'a>> {
    match granularity {
        Granularity::File | Granularity::Default => vec![PagePlan {
            name: slugify(stem),
            info: PageInfo {
                title: summary.title.clone(),
                description: summary.description.clone(),
            },
            operations: summary.operations.iter().collect(),
        }],
        Granularity::Operation => summary
            .operations
            .iter()
            .map(|op| PagePlan {
                name: op.page_name(),
                info: PageInfo {
                    title: op.title(),
                    description: op.description.clone(),
                },
                operations: vec![op],
            })
            .collect(),
        Granularity::Tag => {
            let mut plans = Vec::new();
            for (tag, description) in &summary.tags {
                let operations: Vec<&Operation> = summary
                    .operations
                    .iter()
                    .filter(|op| op.tags.contains(tag))
                    .collect();
                if operations.is_empty() {
                    continue;
                }
                plans.push(PagePlan {
                    name: slugify(tag),
                    info: PageInfo {
                        title: tag.clone(),
                        description: description.clone(),
                    },
                    operations,
                });
            }

            let untagged: Vec<&Operation> = summary
                .operations
                .iter()
                .filter(|op| op.tags.is_empty())
                .collect();
            if !untagged.is_empty() {
                plans.push(PagePlan {
                    name: slugify(stem),
                    info: PageInfo {
                        title: summary.title.clone(),
                        description: summary.description.clone(),
                    },
                    operations: untagged,
                });
            }
            plans
        }
    }
}

fn render_page(
    front_matter: &FrontMatter,
    document_path: &str,
    operations: &[&Operation],
) -> Result<String> {
    let malformed = |message: String| PipelineError::MalformedSpec {
        path: PathBuf::from(document_path),
        message,
    };

    let yaml = serde_yaml::to_string(front_matter).map_err(|e| malformed(e.to_string()))?;
    let document = serde_json::to_string(document_path).map_err(|e| malformed(e.to_string()))?;
    let refs: Vec<OperationRef> = operations.iter().map(|op| op.reference()).collect();
    let operations = serde_json::to_string(&refs).map_err(|e| malformed(e.to_string()))?;

    Ok(format!(
        "---\n{}---\n\n<{} document={{{}}} operations={{{}}} hasHead={{true}} />\n",
        yaml, API_PAGE_COMPONENT, document, operations
    ))
}

fn load_spec(path: &Path) -> Result<SpecSummary> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let malformed = |message: &str| PipelineError::MalformedSpec {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let root: Value = serde_yaml::from_str(&content).map_err(|e| malformed(&e.to_string()))?;
    let root = root
        .as_mapping()
        .ok_or_else(|| malformed("top level is not a mapping"))?;
    if root.get("openapi").is_none() && root.get("swagger").is_none() {
        return Err(malformed("missing 'openapi' version field"));
    }

    let info = root.get("info").and_then(Value::as_mapping);
    let title = info
        .and_then(|info| string_field(info, "title"))
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let description = info.and_then(|info| string_field(info, "description"));

    let mut tags: Vec<(String, Option<String>)> = root
        .get("tags")
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(Value::as_mapping)
                .filter_map(|tag| {
                    string_field(tag, "name").map(|name| (name, string_field(tag, "description")))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut operations = Vec::new();
    if let Some(paths) = root.get("paths").and_then(Value::as_mapping) {
        for (route, item) in paths {
            let (Some(route), Some(item)) = (route.as_str(), item.as_mapping()) else {
                continue;
            };
            for method in HTTP_METHODS {
                let Some(op) = item.get(method).and_then(Value::as_mapping) else {
                    continue;
                };
                let op_tags: Vec<String> = op
                    .get("tags")
                    .and_then(Value::as_sequence)
                    .map(|seq| {
                        seq.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                operations.push(Operation {
                    path: route.to_string(),
                    method: method.to_string(),
                    operation_id: string_field(op, "operationId"),
                    summary: string_field(op, "summary"),
                    description: string_field(op, "description"),
                    tags: op_tags,
                });
            }
        }
    }

    // Tags used by operations but never declared still get a page.
    for op in &operations {
        for tag in &op.tags {
            if !tags.iter().any(|(name, _)| name == tag) {
                tags.push((tag.clone(), None));
            }
        }
    }

    Ok(SpecSummary {
        title,
        description,
        tags,
        operations,
    })
}

fn string_field(mapping: &Mapping, key: &str) -> Option<String> {
    mapping
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "index".to_string()
    } else {
        slug
    }
}

fn unique_name(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}-{}", name, n);
        n += 1;
    }
    candidate
}
