use openapi_content_pipeline::{
    config::{PipelineConfig, RemoteRepository},
    error::{PipelineError, Result},
    generator::{DocGenerator, GenerationRequest, Granularity, MetadataHook, PageInfo},
    pages::OpenApiPageGenerator,
    pipeline::{Pipeline, SUCCESS_MESSAGE},
    rewriter::UrlRewriter,
    walker::FileWalker,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RAW_ROOT: &str = "https://raw.example.com/org/repo/main";

/// Helper function to create a temporary site with the given spec files
fn create_site(specs: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let specs_root = temp_dir.path().join("specs");
    fs::create_dir_all(&specs_root).expect("Failed to create spec root");

    for (path, content) in specs {
        let file_path = specs_root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write spec file");
    }

    temp_dir
}

fn test_config(root: &Path) -> PipelineConfig {
    PipelineConfig::new(root).with_remote(RemoteRepository {
        host: "https://raw.example.com".to_string(),
        owner: "org".to_string(),
        repo: "repo".to_string(),
        git_ref: "main".to_string(),
    })
}

/// Writes one deterministic page per spec, keeping the local document path in the component
/// so the rewrite pass has something to do. Fails for any spec named `broken.yaml`.
struct FixtureGenerator;

impl DocGenerator for FixtureGenerator {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
        front_matter: &MetadataHook<'_>,
    ) -> Result<Vec<PathBuf>> {
        if request.input.file_name().and_then(|n| n.to_str()) == Some("broken.yaml") {
            return Err(PipelineError::MalformedSpec {
                path: request.input.to_path_buf(),
                message: "unexpected end of input".to_string(),
            });
        }

        let meta = front_matter(&PageInfo {
            title: "Fixture".to_string(),
            description: None,
        });
        let page = request.output_dir.join("index.mdx");
        let content = format!(
            "---\ntitle: {}\nfull: {}\ndocument: \"{}\"\n---\n\n<APIPage document={{\"{}\"}} />\n",
            meta.title, meta.full, meta.document, request.document_path
        );
        fs::write(&page, content).map_err(|e| PipelineError::io(&page, e))?;
        Ok(vec![page])
    }
}

#[test]
fn test_same_basename_in_different_directories() {
    let site = create_site(vec![("a/x.yaml", "openapi: 3.0.0"), ("b/x.yaml", "openapi: 3.0.0")]);
    let config = test_config(site.path());

    let result = Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::Default)
        .expect("Generation should succeed");

    assert_eq!(result.message, SUCCESS_MESSAGE);
    assert_eq!(
        result.files,
        vec![PathBuf::from("a/x.yaml"), PathBuf::from("b/x.yaml")]
    );

    let a = fs::read_to_string(site.path().join("content/apis/a/x/index.mdx")).unwrap();
    let b = fs::read_to_string(site.path().join("content/apis/b/x/index.mdx")).unwrap();
    assert_eq!(
        a,
        "---\ntitle: Fixture\nfull: true\ndocument: \"https://raw.example.com/org/repo/main/specs/a/x.yaml\"\n---\n\n\
         <APIPage document={\"https://raw.example.com/org/repo/main/specs/a/x.yaml\"} />\n"
    );
    assert!(b.contains("/specs/b/x.yaml\"} />"));
}

#[test]
fn test_second_run_is_stable() {
    let site = create_site(vec![("billing/invoices.yaml", "openapi: 3.0.0")]);
    let config = test_config(site.path());
    let page = site.path().join("content/apis/billing/invoices/index.mdx");

    Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::File)
        .unwrap();
    let first = fs::read_to_string(&page).unwrap();

    // Rewriting already rewritten pages must not touch them.
    let pages = vec![page.clone()];
    assert_eq!(UrlRewriter::new(RAW_ROOT, "specs").rewrite_all(&pages).unwrap(), 0);
    assert_eq!(fs::read_to_string(&page).unwrap(), first);

    Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::File)
        .unwrap();
    assert_eq!(fs::read_to_string(&page).unwrap(), first);
    assert!(!first.contains("specs/specs"));
}

#[test]
fn test_failure_aborts_and_keeps_earlier_output() {
    let site = create_site(vec![
        ("a/ok.yaml", "openapi: 3.0.0"),
        ("b/ok.yaml", "openapi: 3.0.0"),
        ("c/broken.yaml", "openapi: ["),
        ("d/never.yaml", "openapi: 3.0.0"),
    ]);
    let config = test_config(site.path());

    let err = Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::Default)
        .unwrap_err();

    match &err {
        PipelineError::Generation { spec, .. } => assert_eq!(spec, Path::new("c/broken.yaml")),
        other => panic!("unexpected error: {}", other),
    }

    let apis = site.path().join("content/apis");
    let earlier = fs::read_to_string(apis.join("a/ok/index.mdx")).unwrap();
    assert!(earlier.contains("<APIPage document={\"specs/a/ok.yaml\"} />"));
    assert!(apis.join("b/ok/index.mdx").is_file());
    assert!(!apis.join("d/never").exists());
}

#[test]
fn test_missing_spec_root_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path());

    let err = Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::Default)
        .unwrap_err();

    assert!(err.is_io(), "expected an IO error, got: {}", err);
    let leftovers = FileWalker::new(temp_dir.path()).walk().unwrap();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}

#[test]
fn test_only_pages_are_rewritten() {
    let site = create_site(vec![("x.yaml", "openapi: 3.0.0")]);
    let config = test_config(site.path());
    let notes = site.path().join("content/apis/notes.txt");
    fs::create_dir_all(notes.parent().unwrap()).unwrap();
    fs::write(&notes, "document: \"x.yaml\"\n").unwrap();

    Pipeline::new(&config, FixtureGenerator)
        .generate_all(Granularity::Default)
        .unwrap();

    assert_eq!(fs::read_to_string(&notes).unwrap(), "document: \"x.yaml\"\n");
}

#[test]
fn test_builtin_generator_end_to_end() {
    let petstore = include_str!("fixtures/petstore.yaml");
    let site = create_site(vec![("pets/petstore.yaml", petstore)]);
    let config = test_config(site.path());

    let result = Pipeline::new(&config, OpenApiPageGenerator::default())
        .generate_all(Granularity::Operation)
        .expect("Generation should succeed");
    assert_eq!(result.files, vec![PathBuf::from("pets/petstore.yaml")]);

    let out = site.path().join("content/apis/pets/petstore");
    let mut pages = FileWalker::new(&out).walk().unwrap();
    pages.sort();
    assert_eq!(
        pages,
        vec![
            PathBuf::from("createpet.mdx"),
            PathBuf::from("listpets.mdx"),
            PathBuf::from("showpetbyid.mdx"),
        ]
    );

    let url = "https://raw.example.com/org/repo/main/specs/pets/petstore.yaml";
    for page in pages {
        let content = fs::read_to_string(out.join(&page)).unwrap();
        assert!(
            content.contains(&format!("<APIPage document={{\"{}\"}}", url)),
            "{} was not rewritten:\n{}",
            page.display(),
            content
        );
        assert!(content.contains(url));
        assert!(content.contains("full: true"));
    }
}

#[test]
fn test_builtin_generator_tag_pages() {
    let petstore = include_str!("fixtures/petstore.yaml");
    let site = create_site(vec![("petstore.yaml", petstore)]);
    let config = test_config(site.path());

    Pipeline::new(&config, OpenApiPageGenerator::default())
        .generate_all(Granularity::Tag)
        .unwrap();

    let page = site.path().join("content/apis/petstore/pets.mdx");
    let content = fs::read_to_string(&page).unwrap();
    assert!(content.contains("title: pets"));
    assert!(content.contains("description: Pet operations"));
    assert!(content.contains("\"path\":\"/pets/{petId}\""));
}
