use super::*;
use crate::storage::{MemoryStore, SqliteStore};
use chrono::TimeZone;
use common::jobs::JobStatus;
use common::model::user::Role;

const NS: &str = "csv_review";

fn store() -> JobStore<MemoryStore> {
    let mut store = JobStore::new(MemoryStore::new(), NS);
    store.initialize().unwrap();
    store
}

fn uploaded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn upload(store: &mut JobStore<MemoryStore>, name: &str) -> CsvJob {
    store
        .create_job_from_csv(name, "a,b\n1,2\n3,4\n", uploaded_at())
        .unwrap()
}

fn flags(entries: &[(usize, Flag)]) -> BTreeMap<usize, Flag> {
    entries.iter().copied().collect()
}

#[test]
fn initialize_seeds_once() {
    let mut store = store();
    assert_eq!(store.users().unwrap(), default_users());
    assert!(store.list_jobs().unwrap().is_empty());

    upload(&mut store, "people.csv");
    store.initialize().unwrap();
    assert_eq!(store.list_jobs().unwrap().len(), 1);
}

#[test]
fn authenticate_sets_session_only_on_match() {
    let mut store = store();

    let admin = store.authenticate("admin", "admin123").unwrap().unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(store.current_user().unwrap(), Some(admin.clone()));

    assert_eq!(store.authenticate("admin", "wrong").unwrap(), None);
    assert_eq!(store.current_user().unwrap(), Some(admin));

    store.end_session().unwrap();
    assert_eq!(store.current_user().unwrap(), None);
    store.end_session().unwrap();
}

#[test]
fn upload_creates_pending_job() {
    let mut store = store();
    let job = upload(&mut store, "people.csv");

    assert_eq!(job.id, "job_001");
    assert_eq!(job.name, "people");
    assert_eq!(job.upload_date, "2024-03-01T12:00:00.000Z");
    assert_eq!(job.headers, vec!["a", "b"]);
    assert_eq!(job.data, vec![vec!["1", "2"], vec!["3", "4"]]);
    assert_eq!(job.visible_columns, vec!["a", "b"]);
    assert_eq!(job.total_rows, 2);
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(store.get_job("job_001").unwrap(), Some(job));
}

#[test]
fn upload_rejects_non_csv_and_empty_files() {
    let mut store = store();
    assert!(matches!(
        store.create_job_from_csv("notes.txt", "a,b", uploaded_at()),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create_job_from_csv("empty.csv", "  \n", uploaded_at()),
        Err(StoreError::CsvParse(_))
    ));
    assert!(store.list_storage_keys().unwrap().iter().all(|k| !k.contains("/jobs/job_")));
}

#[test]
fn flag_updates_drive_status() {
    let mut store = store();
    upload(&mut store, "people.csv");

    let job = store.set_flags("job_001", flags(&[(0, Flag::Good)])).unwrap().unwrap();
    assert_eq!(job.flagged_rows, 1);
    assert_eq!(job.status, JobStatus::InProgress);

    let job = store
        .set_flags("job_001", flags(&[(0, Flag::Good), (1, Flag::Bad)]))
        .unwrap()
        .unwrap();
    assert_eq!(job.flagged_rows, 2);
    assert_eq!(job.status, JobStatus::Completed);

    // Unflagging a completed job moves it back.
    let job = store.set_flags("job_001", flags(&[(1, Flag::Bad)])).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::InProgress);

    assert!(store.set_flags("job_404", BTreeMap::new()).unwrap().is_none());
}

#[test]
fn put_job_ignores_caller_counters() {
    let mut store = store();
    let mut job = upload(&mut store, "people.csv");
    job.flags.insert(1, Flag::VeryBad);
    job.status = JobStatus::Completed;
    job.flagged_rows = 40;
    job.total_rows = 99;

    let saved = store.put_job(&job).unwrap();
    assert_eq!(saved.total_rows, 2);
    assert_eq!(saved.flagged_rows, 1);
    assert_eq!(saved.status, JobStatus::InProgress);

    let loaded = store.get_job(&job.id).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.flags, job.flags);
}

#[test]
fn put_job_rejects_invalid_records() {
    let mut store = store();
    let job = upload(&mut store, "people.csv");

    let mut bad_flag = job.clone();
    bad_flag.flags.insert(2, Flag::Good);
    assert!(matches!(store.put_job(&bad_flag), Err(StoreError::Validation(_))));

    let mut bad_column = job.clone();
    bad_column.visible_columns = vec!["zzz".to_string()];
    assert!(matches!(store.put_job(&bad_column), Err(StoreError::Validation(_))));

    let mut bad_cell = job.clone();
    bad_cell.data[0][0] = "two\nlines".to_string();
    assert!(matches!(store.put_job(&bad_cell), Err(StoreError::Validation(_))));

    let mut bad_id = job.clone();
    bad_id.id = "../users".to_string();
    assert!(matches!(store.put_job(&bad_id), Err(StoreError::Validation(_))));

    assert_eq!(store.get_job(&job.id).unwrap(), Some(job));
}

#[test]
fn put_job_round_trips_hand_built_records() {
    let mut store = store();
    let mut job = CsvJob::new(
        "job_042",
        "hand built",
        "2024-03-01T12:00:00.000Z",
        vec!["id".into(), "quote".into(), "".into()],
        vec![
            vec!["1".into(), "say \"hi\", then leave".into(), "".into()],
            vec!["2".into()],
            vec!["".into()],
        ],
    );
    job.visible_columns = vec!["".into(), "id".into()];
    job.flags.insert(2, Flag::VeryBad);

    let saved = store.put_job(&job).unwrap();
    let loaded = store.get_job("job_042").unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(loaded.headers, job.headers);
    assert_eq!(loaded.data, job.data);
    assert_eq!(loaded.visible_columns, vec!["id", ""]);
    assert_eq!(loaded.flags, job.flags);
}

#[test]
fn put_job_rejects_cells_the_csv_cannot_keep() {
    let mut store = store();
    let job = upload(&mut store, "people.csv");

    let mut padded = job.clone();
    padded.data[0][0] = " 1 ".to_string();
    assert!(matches!(store.put_job(&padded), Err(StoreError::Validation(_))));

    let mut padded_header = job.clone();
    padded_header.headers[1] = "b\t".to_string();
    assert!(matches!(store.put_job(&padded_header), Err(StoreError::Validation(_))));

    let mut empty_row = job.clone();
    empty_row.data.insert(0, Vec::new());
    assert!(matches!(store.put_job(&empty_row), Err(StoreError::Validation(_))));

    let mut no_headers = job.clone();
    no_headers.headers.clear();
    no_headers.visible_columns.clear();
    assert!(matches!(store.put_job(&no_headers), Err(StoreError::Validation(_))));

    assert_eq!(store.get_job(&job.id).unwrap(), Some(job));
}

#[test]
fn visible_columns_follow_header_order() {
    let mut store = store();
    store
        .create_job_from_csv("wide.csv", "a,b,c\n1,2,3", uploaded_at())
        .unwrap();

    let job = store
        .set_visible_columns("job_001", vec!["c".into(), "a".into(), "c".into()])
        .unwrap()
        .unwrap();
    assert_eq!(job.visible_columns, vec!["a", "c"]);

    let job = store.set_visible_columns("job_001", Vec::new()).unwrap().unwrap();
    assert!(!job.is_released());
}

#[test]
fn delete_erases_every_fragment() {
    let mut store = store();
    upload(&mut store, "first.csv");
    upload(&mut store, "second.csv");

    assert!(store.delete_job("job_001").unwrap());
    assert_eq!(store.get_job("job_001").unwrap(), None);
    assert!(store
        .list_storage_keys()
        .unwrap()
        .iter()
        .all(|k| !k.contains("job_001")));
    assert_eq!(store.list_jobs().unwrap().len(), 1);

    // Deleting again, or deleting something that never existed, is fine.
    assert!(!store.delete_job("job_001").unwrap());
    assert!(!store.delete_job("job_777").unwrap());
}

#[test]
fn generated_ids_skip_ids_still_in_use() {
    let mut store = store();
    upload(&mut store, "first.csv");
    upload(&mut store, "second.csv");
    store.delete_job("job_001").unwrap();

    // One id is left in the index, so the count-based candidate is job_002,
    // which is taken.
    let job = upload(&mut store, "third.csv");
    assert_eq!(job.id, "job_003");
    assert_eq!(store.get_job("job_002").unwrap().unwrap().name, "second");
}

#[test]
fn generated_ids_grow_past_three_digits() {
    let mut store = store();
    let ids: Vec<String> = (1..=1000).map(paths::format_job_id).collect();
    store.write_json(JOB_INDEX_FILE, &ids).unwrap();
    assert_eq!(store.generate_job_id().unwrap(), "job_1001");
}

#[test]
fn list_jobs_skips_missing_and_corrupt_records() {
    let mut store = store();
    upload(&mut store, "first.csv");
    upload(&mut store, "second.csv");
    upload(&mut store, "third.csv");

    store
        .write(&paths::job_file("job_002", METADATA_FILE), "{ broken")
        .unwrap();
    store
        .erase(&paths::job_file("job_003", ORIGINAL_CSV_FILE))
        .unwrap();

    let names: Vec<String> = store.list_jobs().unwrap().into_iter().map(|j| j.name).collect();
    assert_eq!(names, vec!["first"]);
}

#[test]
fn updated_csv_tracks_flags() {
    let mut store = store();
    upload(&mut store, "people.csv");
    store.set_flags("job_001", flags(&[(1, Flag::Absent)])).unwrap();

    let stored = store
        .read_raw(&paths::job_file("job_001", UPDATED_CSV_FILE))
        .unwrap()
        .unwrap();
    let exported = store.export_flagged_csv("job_001").unwrap().unwrap();
    assert_eq!(stored, exported);
    assert_eq!(
        exported,
        "\"a\",\"b\",\"intern_flag\"\n\"1\",\"2\",\"\"\n\"3\",\"4\",\"1\""
    );
    assert_eq!(store.export_flagged_csv("job_404").unwrap(), None);
}

#[test]
fn storage_keys_are_sorted_and_namespaced() {
    let mut kv = MemoryStore::new();
    kv.set("other_app/users.json", "[]").unwrap();
    let mut store = JobStore::new(kv, NS);
    store.initialize().unwrap();
    store
        .create_job_from_csv("people.csv", "a\n1", uploaded_at())
        .unwrap();

    assert_eq!(
        store.list_storage_keys().unwrap(),
        vec![
            "csv_review/jobs/index.json",
            "csv_review/jobs/job_001/columns.json",
            "csv_review/jobs/job_001/flags.json",
            "csv_review/jobs/job_001/metadata.json",
            "csv_review/jobs/job_001/original.csv",
            "csv_review/jobs/job_001/updated.csv",
            "csv_review/users.json",
        ]
    );
    assert_eq!(
        store.read_raw("csv_review/jobs/job_001/original.csv").unwrap().as_deref(),
        Some("\"a\"\n\"1\"")
    );
}

#[test]
fn backup_round_trips_into_fresh_store() {
    let mut source = store();
    upload(&mut source, "first.csv");
    upload(&mut source, "second.csv");
    source.set_flags("job_002", flags(&[(0, Flag::Bad)])).unwrap();
    source.set_visible_columns("job_001", vec!["b".into()]).unwrap();
    source.authenticate("intern1", "intern123").unwrap();

    let text = source.export_backup().unwrap().to_json_pretty().unwrap();

    let mut target = JobStore::new(SqliteStore::open_in_memory().unwrap(), "restored");
    target.initialize().unwrap();
    upload_into(&mut target);
    target
        .import_backup(&BackupDocument::from_json(&text).unwrap())
        .unwrap();

    assert_eq!(target.users().unwrap(), source.users().unwrap());
    assert_eq!(target.current_user().unwrap(), source.current_user().unwrap());
    assert_eq!(target.list_jobs().unwrap(), source.list_jobs().unwrap());
    assert_eq!(
        target.list_storage_keys().unwrap().len(),
        source.list_storage_keys().unwrap().len()
    );
}

fn upload_into(store: &mut JobStore<SqliteStore>) {
    for name in ["x.csv", "y.csv", "z.csv"] {
        store.create_job_from_csv(name, "c\n9", uploaded_at()).unwrap();
    }
}

#[test]
fn import_replaces_instead_of_merging() {
    let mut store = store();
    upload(&mut store, "old.csv");

    let doc = BackupDocument {
        users: Some(vec![User::new("solo", "pw", Role::Admin)]),
        job_index: Some(Vec::new()),
        ..Default::default()
    };
    store.import_backup(&doc).unwrap();

    assert!(store.list_jobs().unwrap().is_empty());
    assert_eq!(
        store.list_storage_keys().unwrap(),
        vec!["csv_review/jobs/index.json", "csv_review/users.json"]
    );
    assert!(store.authenticate("admin", "admin123").unwrap().is_none());
    assert!(store.authenticate("solo", "pw").unwrap().is_some());
}

#[test]
fn invalid_backup_leaves_store_untouched() {
    let mut store = store();
    upload(&mut store, "people.csv");
    let before = store.export_backup().unwrap();

    let doc = BackupDocument::from_json(r#"{ "users.json": [] }"#).unwrap();
    assert!(matches!(store.import_backup(&doc), Err(StoreError::Validation(_))));

    assert_eq!(store.export_backup().unwrap(), before);
}

#[test]
fn export_refuses_corrupt_fragments() {
    let mut store = store();
    upload(&mut store, "people.csv");
    store
        .write(&paths::job_file("job_001", FLAGS_FILE), "{ broken")
        .unwrap();
    let keys = store.list_storage_keys().unwrap();

    assert!(matches!(store.export_backup(), Err(StoreError::JsonParse(_))));
    assert_eq!(store.list_storage_keys().unwrap(), keys);
    assert_eq!(
        store.read_raw(&paths::job_file("job_001", FLAGS_FILE)).unwrap().as_deref(),
        Some("{ broken")
    );
}
