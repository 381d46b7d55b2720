//! Command handlers
//!
//! Each handler validates, performs a single atomic version-id assignment,
//! and publishes exactly one event before returning. The update family all
//! reduce to the same copy-on-write supersession: derive a successor from
//! the referenced version, retire the original as of the successor's
//! effective date, and publish both sides as one composite event.

use chrono::{NaiveDate, Utc};

use crate::error::{RegistryError, RegistryResult};
use crate::store::ModelStore;
use crate::types::{
    CreateFileModel, FileModel, FileModelCommand, FileModelEvent, InactivateFileModel,
    SetActiveReconDate, UpdateFileModel, VersionId, VersionedFileModel,
};

use super::FileModelRegistry;

/// Field overrides an update-family command applies to the version it
/// supersedes
struct Overrides {
    active_recon_date: Option<NaiveDate>,
    active: Option<bool>,
    file_model: Option<FileModel>,
}

pub(super) fn create_file_model(
    registry: &FileModelRegistry,
    cmd: CreateFileModel,
) -> RegistryResult<VersionId> {
    // The file model was validated at construction; nothing can fail past
    // this point, so consuming an id is safe.
    let _guard = registry.command_guard.lock();

    let version_id = registry.allocate_version_id();
    let version = VersionedFileModel::new(
        cmd.file_id,
        version_id,
        cmd.active,
        cmd.active_recon_date,
        None,
        Utc::now(),
        cmd.username.as_str(),
        cmd.file_model,
    );

    registry.bus.publish(&FileModelEvent::Created { version });
    Ok(version_id)
}

pub(super) fn update_file_model(
    registry: &FileModelRegistry,
    cmd: UpdateFileModel,
) -> RegistryResult<VersionId> {
    let overrides = Overrides {
        active_recon_date: cmd.active_recon_date,
        active: cmd.active,
        file_model: cmd.file_model.clone(),
    };
    supersede(
        registry,
        cmd.version_id,
        overrides,
        FileModelCommand::UpdateFileModel(cmd),
    )
}

pub(super) fn set_active_recon_date(
    registry: &FileModelRegistry,
    cmd: SetActiveReconDate,
) -> RegistryResult<VersionId> {
    let overrides = Overrides {
        active_recon_date: Some(cmd.active_recon_date),
        active: None,
        file_model: None,
    };
    supersede(
        registry,
        cmd.version_id,
        overrides,
        FileModelCommand::SetActiveReconDate(cmd),
    )
}

pub(super) fn inactivate_file_model(
    registry: &FileModelRegistry,
    cmd: InactivateFileModel,
) -> RegistryResult<VersionId> {
    let overrides = Overrides {
        active_recon_date: None,
        active: Some(false),
        file_model: None,
    };
    supersede(
        registry,
        cmd.version_id,
        overrides,
        FileModelCommand::InactivateFileModel(cmd),
    )
}

/// Copy-on-write supersession shared by the whole update family.
///
/// Runs under the command guard: the lookup, the conflict check, the id
/// allocation and the publication form one critical section, so a version
/// can only ever be superseded once.
fn supersede(
    registry: &FileModelRegistry,
    version_id: VersionId,
    overrides: Overrides,
    command: FileModelCommand,
) -> RegistryResult<VersionId> {
    let _guard = registry.command_guard.lock();

    let current = match registry.read_model.get_by_version(version_id)? {
        Some(version) => version,
        None => return reject(registry, command, RegistryError::VersionNotFound(version_id)),
    };

    if current.is_superseded() {
        return reject(registry, command, RegistryError::Superseded(version_id));
    }

    let effective_date = overrides
        .active_recon_date
        .unwrap_or_else(|| current.active_recon_date());

    let successor_id = registry.allocate_version_id();
    let successor = VersionedFileModel::new(
        current.file_id(),
        successor_id,
        overrides.active.unwrap_or_else(|| current.is_active()),
        effective_date,
        None,
        Utc::now(),
        command.username(),
        overrides
            .file_model
            .unwrap_or_else(|| current.file_model().clone()),
    );
    let retired = current.retired(effective_date);

    registry
        .bus
        .publish(&FileModelEvent::Superseded { retired, successor });
    Ok(successor_id)
}

/// Publish a rejection event and surface the error to the caller. No
/// version id is consumed on this path.
fn reject(
    registry: &FileModelRegistry,
    command: FileModelCommand,
    error: RegistryError,
) -> RegistryResult<VersionId> {
    let reason = error.to_string();
    log::warn!("command {} rejected: {}", command.id(), reason);
    registry
        .bus
        .publish(&FileModelEvent::CommandRejected { command, reason });
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventSubscriber;
    use crate::types::{ColumnType, CsvColumn, CsvFileModel};
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn csv_model() -> FileModel {
        FileModel::Csv(
            CsvFileModel::new(
                0,
                0,
                ",",
                vec![CsvColumn::new("accountId", ColumnType::int(), true).unwrap()],
            )
            .unwrap(),
        )
    }

    fn create_cmd(file_id: u64) -> CreateFileModel {
        CreateFileModel::new("dg", "test", file_id, date(2018, 1, 31), true, csv_model())
    }

    struct EventLog {
        events: Mutex<Vec<FileModelEvent>>,
    }

    impl EventLog {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }
    }

    impl EventSubscriber for EventLog {
        fn name(&self) -> &str {
            "event-log"
        }

        fn on_event(&self, event: &FileModelEvent) {
            self.events.lock().push(event.clone());
        }
    }

    #[test]
    fn test_version_ids_increase_across_file_ids() {
        let registry = FileModelRegistry::new();
        let a = registry.create_file_model(create_cmd(1)).unwrap();
        let b = registry.create_file_model(create_cmd(2)).unwrap();
        let c = registry.create_file_model(create_cmd(1)).unwrap();
        assert_eq!((a, b, c), (0, 1, 2));
    }

    #[test]
    fn test_create_publishes_created_event() {
        let registry = FileModelRegistry::new();
        let log = EventLog::new();
        registry.event_bus().subscribe(log.clone());

        let id = registry.create_file_model(create_cmd(231)).unwrap();

        let events = log.events.lock();
        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], FileModelEvent::Created { version } if version.version_id() == id)
        );
    }

    #[test]
    fn test_update_supersedes_original() {
        let registry = FileModelRegistry::new();
        let log = EventLog::new();
        registry.event_bus().subscribe(log.clone());

        let original = registry.create_file_model(create_cmd(231)).unwrap();
        let successor = registry
            .update_file_model(UpdateFileModel::new(
                "dg",
                "bump date",
                original,
                Some(date(2019, 1, 1)),
                None,
                None,
            ))
            .unwrap();

        assert_ne!(successor, original);

        let old = registry.get_by_version(original).unwrap().unwrap();
        assert!(!old.is_active());
        assert_eq!(old.inactive_recon_date(), Some(date(2019, 1, 1)));

        let new = registry.get_by_version(successor).unwrap().unwrap();
        assert!(new.is_active());
        assert_eq!(new.active_recon_date(), date(2019, 1, 1));
        assert_eq!(new.file_model(), old.file_model());

        let events = log.events.lock();
        assert!(matches!(&events[1], FileModelEvent::Superseded { .. }));
    }

    #[test]
    fn test_update_unknown_version_rejects() {
        let registry = FileModelRegistry::new();
        let log = EventLog::new();
        registry.event_bus().subscribe(log.clone());

        let result = registry.update_file_model(UpdateFileModel::new(
            "dg",
            "",
            42,
            Some(date(2019, 1, 1)),
            None,
            None,
        ));

        assert!(matches!(result, Err(RegistryError::VersionNotFound(42))));

        let events = log.events.lock();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            FileModelEvent::CommandRejected { reason, .. }
                if reason == "file model version 42 not found"
        ));

        // The failed command consumed no id
        drop(events);
        assert_eq!(registry.create_file_model(create_cmd(1)).unwrap(), 0);
    }

    #[test]
    fn test_double_update_of_same_version_conflicts() {
        let registry = FileModelRegistry::new();
        let original = registry.create_file_model(create_cmd(231)).unwrap();

        registry
            .update_file_model(UpdateFileModel::new(
                "dg",
                "",
                original,
                Some(date(2019, 1, 1)),
                None,
                None,
            ))
            .unwrap();

        let second = registry.update_file_model(UpdateFileModel::new(
            "dg",
            "",
            original,
            Some(date(2020, 1, 1)),
            None,
            None,
        ));
        assert!(matches!(second, Err(RegistryError::Superseded(v)) if v == original));
    }

    #[test]
    fn test_set_active_recon_date_changes_only_the_date() {
        let registry = FileModelRegistry::new();
        let original = registry.create_file_model(create_cmd(231)).unwrap();

        let successor = registry
            .set_active_recon_date(SetActiveReconDate::new("dg", "", original, date(2018, 6, 1)))
            .unwrap();

        let new = registry.get_by_version(successor).unwrap().unwrap();
        assert!(new.is_active());
        assert_eq!(new.active_recon_date(), date(2018, 6, 1));
    }

    #[test]
    fn test_inactivate_keeps_effective_date() {
        let registry = FileModelRegistry::new();
        let original = registry.create_file_model(create_cmd(231)).unwrap();

        let successor = registry
            .inactivate_file_model(InactivateFileModel::new("dg", "retire", original))
            .unwrap();

        let new = registry.get_by_version(successor).unwrap().unwrap();
        assert!(!new.is_active());
        assert_eq!(new.active_recon_date(), date(2018, 1, 31));

        let old = registry.get_by_version(original).unwrap().unwrap();
        assert_eq!(old.inactive_recon_date(), Some(date(2018, 1, 31)));
    }

    #[test]
    fn test_submit_dispatches_by_command_kind() {
        let registry = FileModelRegistry::new();
        let id = registry
            .submit(FileModelCommand::CreateFileModel(create_cmd(231)))
            .unwrap();
        let next = registry
            .submit(FileModelCommand::InactivateFileModel(
                InactivateFileModel::new("dg", "", id),
            ))
            .unwrap();
        assert_eq!(next, id + 1);
    }
}
