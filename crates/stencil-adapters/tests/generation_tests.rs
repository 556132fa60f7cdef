//! End-to-end generation through the real adapters.

use std::fs;
use std::path::{Path, PathBuf};

use stencil_adapters::{
    FileAnswers, FilesystemArchetypeStore, InMemoryArchetypeStore, LayeredAnswers,
    LocalFilesystem, MapAnswers, MemoryFilesystem, PlaceholderRenderer,
};
use stencil_core::{
    application::{ApplicationError, GenerateService, ports::Filesystem},
    domain::{
        Archetype, ArchetypeMetadata, CaseSet, CasingRule, DirectorySpec, DomainError, FileSpec,
        PromptSpec, TemplateNode,
    },
    error::StencilError,
};
use tempfile::TempDir;
use walkdir::WalkDir;

fn demo_archetype() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/python-rest-service")
}

fn demo_answers() -> MapAnswers {
    MapAnswers::new()
        .with("org-name", "Acme Corp")
        .with("solution-name", "billing")
        .with("prefix-name", "user")
}

fn local_service() -> GenerateService {
    GenerateService::new(
        Box::new(FilesystemArchetypeStore::new()),
        Box::new(PlaceholderRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
}

/// Relative path and bytes of every file under `root`, sorted.
fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().into_owned();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn renders_demo_archetype() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");

    let report = local_service()
        .generate(&demo_archetype(), &demo_answers(), &dest)
        .unwrap();
    assert_eq!(report.archetype, "python-rest-service");
    assert!(report.files > 0);

    let project = dest.join("user-service");
    let readme = fs::read_to_string(project.join("README.md")).unwrap();
    assert!(readme.starts_with("# UserService\n"));
    assert!(readme.contains("Billing service owned by Acme Corp."));
    assert!(readme.contains("Maintained by Platform Team."));

    let router = fs::read_to_string(
        project.join("user-service-api/src/acme_corp/billing/user/service/api/routers/api_v1.py"),
    )
    .unwrap();
    assert!(router.contains(r#"@router.get("/{user_id}")"#));
    assert!(router.contains(r#"f"user {user_id} not found""#));
    assert!(router.contains("async def create_user(record: UserRecord) -> UserRecord:"));

    let main = fs::read_to_string(
        project.join("user-service-server/src/acme_corp/billing/user/service/server/main.py"),
    )
    .unwrap();
    assert!(main.contains("USER_SERVICE_PORT"));
}

#[test]
fn escape_and_verbatim_content_survive() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    local_service()
        .generate(&demo_archetype(), &demo_answers(), &dest)
        .unwrap();

    let project = dest.join("user-service");
    let ci = fs::read_to_string(project.join(".github/workflows/ci.yml")).unwrap();
    assert!(ci.contains("REGISTRY_TOKEN: ${{ secrets.REGISTRY_TOKEN }}"));
    assert!(ci.contains("SERVICE_NAME: user-service"));

    // Path is rendered, body is copied untouched.
    let dashboard = fs::read_to_string(project.join("ops/dashboards/user-service.json")).unwrap();
    assert!(dashboard.contains(r#""legendFormat": "{{ instance }}""#));
}

#[cfg(unix)]
#[test]
fn executable_bit_is_carried_over() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    local_service()
        .generate(&demo_archetype(), &demo_answers(), &dest)
        .unwrap();

    let script = dest.join("user-service/scripts/dev-setup.py");
    let mode = fs::metadata(script).unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0);
}

#[test]
fn two_renders_are_byte_identical() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first");
    let second = temp.path().join("second");
    let service = local_service();

    service.generate(&demo_archetype(), &demo_answers(), &first).unwrap();
    service.generate(&demo_archetype(), &demo_answers(), &second).unwrap();

    let a = snapshot(&first);
    assert!(!a.is_empty());
    assert_eq!(a, snapshot(&second));
}

#[test]
fn answer_file_drives_generation() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    let answers = LayeredAnswers::new()
        .with("cli", MapAnswers::new().with("prefix-name", "order"))
        .with("file", FileAnswers::load(demo_archetype().join("answers.yaml")).unwrap());

    local_service()
        .generate(&demo_archetype(), &answers, &dest)
        .unwrap();

    assert!(dest.join("order-service/README.md").is_file());
    assert!(!dest.join("user-service").exists());
}

#[test]
fn missing_answer_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    let answers = MapAnswers::new().with("org-name", "Acme");

    let err = local_service()
        .generate(&demo_archetype(), &answers, &dest)
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::MissingAnswer { ref key }) if key == "solution-name"
    ));
    assert!(!dest.exists());
}

#[test]
fn unresolved_placeholder_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let archetype = temp.path().join("broken");
    fs::create_dir_all(archetype.join("contents/app")).unwrap();
    fs::write(
        archetype.join("archetype.toml"),
        "[archetype]\nname = \"broken\"\n\n[[prompts]]\nlabel = \"Name\"\nkey = \"name\"\n",
    )
    .unwrap();
    fs::write(archetype.join("contents/app/{{ name }}.txt"), "hello {{ name }}").unwrap();
    fs::write(archetype.join("contents/app/z.txt"), "owner: {{ owner }}").unwrap();

    let dest = temp.path().join("out");
    let err = local_service()
        .generate(&archetype, &MapAnswers::new().with("name", "demo"), &dest)
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::UnresolvedPlaceholder { ref key, .. }) if key == "owner"
    ));
    assert!(!dest.exists());
}

#[test]
fn non_empty_destination_is_refused() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep.txt"), "mine").unwrap();

    let err = local_service()
        .generate(&demo_archetype(), &demo_answers(), temp.path())
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Domain(DomainError::DestinationConflict { .. })
    ));
    assert_eq!(fs::read_to_string(temp.path().join("keep.txt")).unwrap(), "mine");
}

#[test]
fn empty_destination_is_accepted() {
    let temp = TempDir::new().unwrap();

    local_service()
        .generate(&demo_archetype(), &demo_answers(), temp.path())
        .unwrap();

    assert!(temp.path().join("user-service/README.md").is_file());
}

#[test]
fn failed_write_rolls_back_everything() {
    let fs = MemoryFilesystem::new().failing_writes_to("main.py");
    let service = GenerateService::new(
        Box::new(FilesystemArchetypeStore::new()),
        Box::new(PlaceholderRenderer::new()),
        Box::new(fs.clone()),
    );

    let err = service
        .generate(&demo_archetype(), &demo_answers(), Path::new("/virtual/out"))
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Application(ApplicationError::FilesystemError { .. })
    ));
    assert!(fs.list_files().is_empty());
}

#[test]
fn rollback_removes_missing_parents_it_created() {
    let fs = MemoryFilesystem::new().failing_writes_to("main.py");
    fs.create_dir_all(Path::new("/srv")).unwrap();
    let service = GenerateService::new(
        Box::new(FilesystemArchetypeStore::new()),
        Box::new(PlaceholderRenderer::new()),
        Box::new(fs.clone()),
    );

    service
        .generate(&demo_archetype(), &demo_answers(), Path::new("/srv/a/b/out"))
        .unwrap_err();

    assert!(fs.exists(Path::new("/srv")));
    assert!(!fs.exists(Path::new("/srv/a")));
    assert!(fs.list_files().is_empty());
}

#[test]
fn dry_run_plans_without_writing() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");

    let report = local_service()
        .plan(&demo_archetype(), &demo_answers(), &dest)
        .unwrap();

    assert!(report.dry_run);
    assert!(report.entries.iter().any(|e| e.ends_with("README.md")));
    assert!(!dest.exists());
}

#[test]
fn demo_archetype_passes_check() {
    let report = local_service().check(&demo_archetype()).unwrap();
    assert!(report.is_clean(), "issues: {:?}", report.issues);
    assert_eq!(report.prompts, 5);
}

#[test]
fn archetype_built_in_code_renders_into_memory() {
    let archetype = Archetype::builder()
        .metadata(ArchetypeMetadata::new("cli-tool"))
        .prompt(
            PromptSpec::new("Tool name", "tool-name")
                .cased_as(CasingRule::CasedIdentity(CaseSet::Programming)),
        )
        .add_node(TemplateNode::Directory(DirectorySpec::new("{{ tool-name }}/docs")))
        .add_node(TemplateNode::File(
            FileSpec::text("{{ tool-name }}/bin/{{ tool_name }}.sh", "exec {{ TOOL_NAME }}_BIN")
                .executable(),
        ))
        .build()
        .unwrap();

    let store = InMemoryArchetypeStore::new();
    store.insert("mem://cli-tool", archetype).unwrap();
    let fs = MemoryFilesystem::new();
    let service = GenerateService::new(
        Box::new(store),
        Box::new(PlaceholderRenderer::new()),
        Box::new(fs.clone()),
    );

    let answers = MapAnswers::new().with("tool-name", "log shipper");
    let report = service
        .generate(Path::new("mem://cli-tool"), &answers, Path::new("/virtual/out"))
        .unwrap();

    assert_eq!(report.files, 1);
    let script = Path::new("/virtual/out/log-shipper/bin/log_shipper.sh");
    assert_eq!(fs.read_to_string(script).as_deref(), Some("exec LOG_SHIPPER_BIN"));
    assert!(fs.is_executable(script));
}
