use std::fs;
use std::path::{Path, PathBuf};

use pipelines_hack::{GenerateConfig, ManifestGenerator, TemplateRenderer};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/generate")
        .join(name)
}

fn generate(name: &str, target: &Path) -> Vec<PathBuf> {
    let config = GenerateConfig::load(&fixture(name)).unwrap();
    let renderer = TemplateRenderer::new().unwrap();
    ManifestGenerator::new(&renderer, target)
        .generate(&config)
        .unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn minimal_config_generates_main_tree() {
    let temp = TempDir::new().unwrap();

    generate("minimal.yaml", temp.path());

    assert_eq!(file_names(&temp.path().join(".konflux")), vec!["main"]);
    assert_eq!(
        file_names(&temp.path().join(".konflux/main")),
        vec![
            "application.yaml",
            "component-a.yaml",
            "component-b.yaml",
            "image-a.yaml",
            "image-b.yaml",
            "tests.yaml",
        ]
    );
    assert!(!temp.path().join(".github").exists());
    assert_eq!(
        file_names(&temp.path().join(".tekton")),
        vec![
            "docker-build.yaml",
            "foo-main-a-pull-request.yaml",
            "foo-main-a-push.yaml",
            "foo-main-b-pull-request.yaml",
            "foo-main-b-push.yaml",
        ]
    );
}

#[test]
fn release_branches_get_their_own_trees() {
    let temp = TempDir::new().unwrap();

    generate("release-branches.yaml", temp.path());

    assert_eq!(
        file_names(&temp.path().join(".konflux")),
        vec!["main", "release-v1.20.x", "release-v1.21.x"]
    );
    assert!(temp
        .path()
        .join(".konflux/release-v1.21.x/release-plan.yaml")
        .is_file());
    assert_eq!(
        file_names(&temp.path().join(".github/workflows")),
        vec![
            "auto-merge.main.yaml",
            "auto-merge.release-v1.20.x.yaml",
            "auto-merge.release-v1.21.x.yaml",
            "update-sources.main.yaml",
            "update-sources.release-v1.20.x.yaml",
            "update-sources.release-v1.21.x.yaml",
        ]
    );

    let update_sources = fs::read_to_string(
        temp.path()
            .join(".github/workflows/update-sources.release-v1.21.x.yaml"),
    )
    .unwrap();
    assert!(update_sources.contains("release-v1.1.x"));
    assert!(update_sources.contains("      - name: Apply Update go.mod\n"));
    assert!(update_sources.contains("          echo release-v1.21.x\n"));

    // Pipeline runs exist for main only.
    let tekton = file_names(&temp.path().join(".tekton"));
    assert!(tekton.iter().all(|name| !name.contains("1-21") && !name.contains("1-20")));
    assert!(tekton.contains(&"tektoncd-pipeline-main-webhook-push.yaml".to_string()));

    let pull_request = fs::read_to_string(
        temp.path()
            .join(".tekton/tektoncd-pipeline-main-webhook-pull-request.yaml"),
    )
    .unwrap();
    assert!(pull_request.contains("        - linux/x86_64\n        - linux/arm64"));
}

#[test]
fn generation_is_deterministic_and_keeps_existing_pipeline() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::create_dir_all(second.path().join(".tekton")).unwrap();
    fs::write(second.path().join(".tekton/docker-build.yaml"), "# customised\n").unwrap();

    let written_first = generate("release-branches.yaml", first.path());
    let written_second = generate("release-branches.yaml", second.path());

    assert_eq!(written_first.len(), written_second.len() + 1);
    for path in &written_second {
        let relative = path.strip_prefix(second.path()).unwrap();
        assert_eq!(
            fs::read(first.path().join(relative)).unwrap(),
            fs::read(path).unwrap(),
            "{} differs",
            relative.display()
        );
    }
    assert_eq!(
        fs::read_to_string(second.path().join(".tekton/docker-build.yaml")).unwrap(),
        "# customised\n"
    );
}

#[test]
fn generated_manifests_are_valid_yaml() {
    let temp = TempDir::new().unwrap();

    for path in generate("release-branches.yaml", temp.path()) {
        let content = fs::read_to_string(&path).unwrap();
        let parsed: Result<serde_yaml::Value, _> = serde_yaml::from_str(&content);
        assert!(parsed.is_ok(), "{} is not valid YAML", path.display());
    }
}
