use std::io::Cursor;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rolo_core::diff::diff_snapshots;
use rolo_core::icloud::{ICloudContact, ICloudGroup, RemoteSnapshot};
use rolo_core::models::Name;
use rolo_core::reconcile::UpdateReviewer;
use rolo_core::transform::icloud_contact_to_contact;
use rolo_core::Contact;
use tempfile::TempDir;

use crate::cli::CompletionShell;
use crate::commands::common::{beside, bordered, Context};
use crate::commands::completions::{render_completions, run_completions};
use crate::commands::export::export_vault;
use crate::commands::pull::{pull_contacts, TerminalReviewer};
use crate::commands::tags::list_tags;
use crate::config::RoloConfig;
use crate::error::CliError;

fn context(dir: &Path, config: RoloConfig) -> Context {
    Context::from_config(
        config,
        dir.join("config.json"),
        Some(&dir.join("data")),
        None,
    )
}

fn remote(uuid: &str, first_name: &str, etag: &str) -> ICloudContact {
    ICloudContact {
        contact_id: Some(uuid.to_string()),
        etag: Some(etag.to_string()),
        first_name: Some(first_name.to_string()),
        ..ICloudContact::default()
    }
}

fn local(uuid: &str, first_name: &str, etag: &str) -> Contact {
    let mut contact = icloud_contact_to_contact(&remote(uuid, first_name, etag)).unwrap();
    contact.id = Some(format!("local-{uuid}"));
    contact
}

fn named(first_name: &str) -> Contact {
    Contact {
        name: Name {
            first_name: Some(first_name.to_string()),
            ..Name::default()
        },
        ..Contact::default()
    }
}

fn reviewer(answers: &str) -> TerminalReviewer<Cursor<Vec<u8>>, Vec<u8>> {
    TerminalReviewer::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

#[test]
fn bordered_pads_every_line() {
    assert_eq!(
        bordered("ab\nabcd"),
        "+------+\n| ab   |\n| abcd |\n+------+"
    );
}

#[test]
fn beside_aligns_columns() {
    assert_eq!(beside("a\nbbb", "x\ny\nz"), "a    x\nbbb  y\n     z");
}

#[test]
fn reviewer_accepts_yes_in_any_case() {
    let current = named("Ada");
    let change = diff_snapshots(&current, &named("Augusta")).unwrap().unwrap();

    let mut terminal = reviewer("Y\ny\n");
    assert!(terminal.review(&current, &change).unwrap());
    assert!(terminal.review(&current, &change).unwrap());

    let output = String::from_utf8(terminal.into_output()).unwrap();
    assert!(output.contains("Accept update? [Y/N]: "));
    assert!(output.contains("\"$replace\""));
    assert!(output.contains("\"Ada\""));
}

#[test]
fn reviewer_declines_anything_else() {
    let current = named("Ada");
    let change = diff_snapshots(&current, &named("Augusta")).unwrap().unwrap();

    let mut terminal = reviewer("n\nyes\n");
    assert!(!terminal.review(&current, &change).unwrap());
    assert!(!terminal.review(&current, &change).unwrap());
}

#[test]
fn reviewer_aborts_at_end_of_input() {
    let current = named("Ada");
    let change = diff_snapshots(&current, &named("Augusta")).unwrap().unwrap();

    let mut terminal = reviewer("");
    assert!(matches!(
        terminal.review(&current, &change),
        Err(rolo_core::Error::Aborted(_))
    ));
}

#[test]
fn context_resolves_paths_from_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"data_dir": "/srv/rolo", "ignored_uuids": ["SKIP"]}"#,
    )
    .unwrap();

    let ctx = Context::resolve(Some(&config_path), None, None).unwrap();
    assert_eq!(ctx.data_dir, PathBuf::from("/srv/rolo"));
    assert_eq!(ctx.cache_path, PathBuf::from("/srv/rolo/icloud-cache.json"));
    assert!(ctx.ignored_uuids().contains("SKIP"));

    let ctx = Context::resolve(
        Some(&config_path),
        Some(Path::new("/flag")),
        Some(Path::new("/tmp/cache.json")),
    )
    .unwrap();
    assert_eq!(ctx.data_dir, PathBuf::from("/flag"));
    assert_eq!(ctx.cache_path, PathBuf::from("/tmp/cache.json"));
}

#[test]
fn context_reports_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, "not json").unwrap();

    assert!(matches!(
        Context::resolve(Some(&config_path), None, None),
        Err(CliError::Config(_))
    ));
}

#[test]
fn remote_client_requires_service_root() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let error = ctx.remote_client().unwrap_err();
    assert!(matches!(error, CliError::RemoteNotConfigured(_)));
    assert!(error.to_string().contains("config.json"));
}

#[test]
fn cached_pull_reconciles_and_persists() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let store = ctx.store();
    let unlinked = named("Local");
    store
        .save_contacts(&[
            local("A", "Ada", "C=1"),
            local("B", "Grace", "C=1"),
            unlinked.clone(),
        ])
        .unwrap();
    ctx.cache()
        .save(&RemoteSnapshot {
            contacts: vec![remote("A", "Ada", "C=2"), remote("B", "Grace Brewster", "C=2")],
            groups: vec![ICloudGroup {
                group_id: "G".into(),
                name: "CTY".into(),
                contact_ids: vec!["A".into()],
                ..ICloudGroup::default()
            }],
        })
        .unwrap();

    let snapshot = ctx.cache().load().unwrap();
    let mut terminal = reviewer("y\n");
    let report = pull_contacts(&ctx, snapshot, &mut terminal).unwrap();

    assert_eq!(report.etag_only, 1);
    assert_eq!(report.accepted, 1);
    let saved = store.load_contacts().unwrap();
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0], local("A", "Ada", "C=2"));
    assert_eq!(saved[1].name.first_name.as_deref(), Some("Grace Brewster"));
    assert_eq!(saved[1].id.as_deref(), Some("local-B"));
    assert!(saved[1].mtime.is_some());
    assert_eq!(saved[2], unlinked);

    let groups = store.load_groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].icloud.contact_uuids, vec!["A"]);
}

#[test]
fn aborted_pull_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let store = ctx.store();
    store.save_contacts(&[local("A", "Ada", "C=1")]).unwrap();
    let before = std::fs::read_to_string(store.contacts_path()).unwrap();

    let snapshot = RemoteSnapshot {
        contacts: vec![remote("A", "Augusta", "C=2")],
        groups: Vec::new(),
    };
    let result = pull_contacts(&ctx, snapshot, &mut reviewer(""));

    assert!(matches!(
        result,
        Err(CliError::Core(rolo_core::Error::Aborted(_)))
    ));
    assert_eq!(std::fs::read_to_string(store.contacts_path()).unwrap(), before);
    assert!(!store.groups_path().exists());
}

#[test]
fn unsupported_field_fails_pull_before_any_write() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let store = ctx.store();
    store
        .save_contacts(&[local("A", "Ada", "C=1"), local("B", "Grace", "C=1")])
        .unwrap();
    let before = std::fs::read_to_string(store.contacts_path()).unwrap();

    let mut with_job_title = remote("B", "Grace", "C=2");
    with_job_title.job_title = Some("Rear Admiral".into());
    let snapshot = RemoteSnapshot {
        contacts: vec![remote("A", "Ada", "C=2"), with_job_title],
        groups: vec![ICloudGroup {
            group_id: "G".into(),
            name: "CTY".into(),
            ..ICloudGroup::default()
        }],
    };
    let result = pull_contacts(&ctx, snapshot, &mut reviewer("y\n"));

    assert!(matches!(
        result,
        Err(CliError::Core(rolo_core::Error::UnsupportedField {
            field: "jobTitle",
            ..
        }))
    ));
    assert_eq!(std::fs::read_to_string(store.contacts_path()).unwrap(), before);
    assert!(!store.groups_path().exists());
}

#[test]
fn failed_groups_write_keeps_contacts_on_pull() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let store = ctx.store();
    store.save_contacts(&[local("A", "Ada", "C=1")]).unwrap();
    let before = std::fs::read_to_string(store.contacts_path()).unwrap();
    std::fs::create_dir(ctx.data_dir.join("groups.json.tmp")).unwrap();

    let snapshot = RemoteSnapshot {
        contacts: vec![remote("A", "Ada", "C=2")],
        groups: Vec::new(),
    };
    assert!(pull_contacts(&ctx, snapshot, &mut reviewer("")).is_err());
    assert_eq!(std::fs::read_to_string(store.contacts_path()).unwrap(), before);
}

#[test]
fn ignored_remote_contacts_are_not_pulled() {
    let dir = TempDir::new().unwrap();
    let config = RoloConfig {
        ignored_uuids: vec!["A".into()],
        ..RoloConfig::default()
    };
    let ctx = context(dir.path(), config);
    ctx.store().save_contacts(&[local("A", "Ada", "C=1")]).unwrap();

    let mut bad = remote("A", "Augusta", "C=2");
    bad.job_title = Some("Countess".into());
    let snapshot = RemoteSnapshot {
        contacts: vec![bad],
        groups: Vec::new(),
    };
    let report = pull_contacts(&ctx, snapshot, &mut reviewer("")).unwrap();

    assert_eq!(report.contacts, vec![local("A", "Ada", "C=1")]);
    assert_eq!(report.changed(), 0);
}

#[test]
fn tags_are_listed_from_store() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    let mut first = named("Ada");
    first.tags = Some(vec!["NU".into(), "CTY".into()]);
    let mut second = named("Grace");
    second.tags = Some(vec!["CTY".into()]);
    ctx.store().save_contacts(&[first, second]).unwrap();

    assert_eq!(list_tags(&ctx).unwrap(), vec!["CTY", "NU"]);
}

#[test]
fn export_vault_requires_root() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path(), RoloConfig::default());
    assert!(matches!(
        export_vault(&ctx, None),
        Err(CliError::VaultNotConfigured(_))
    ));
}

#[test]
fn export_vault_writes_notes() {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("vault");
    let config = RoloConfig {
        vault_root: Some(vault.clone()),
        ..RoloConfig::default()
    };
    let ctx = context(dir.path(), config);
    ctx.store()
        .save_contacts(&[local("A", "Ada", "C=1"), named("No Id")])
        .unwrap();

    let summary = export_vault(&ctx, None).unwrap();
    assert_eq!(summary.written, 1);
    assert_eq!(summary.without_id, 1);

    let note = std::fs::read_to_string(vault.join("data/contacts/objects/local-A.md")).unwrap();
    assert!(note.contains("# Ada"));
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("rolo"));
    assert!(script.contains("sync-groups"));
}

#[test]
fn completions_can_be_written_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rolo.fish");
    run_completions(CompletionShell::Fish, Some(&path)).unwrap();
    assert!(std::fs::read_to_string(path).unwrap().contains("export-vault"));
}
