//! # Job Store
//!
//! Repository of users, the login session and CSV review jobs, laid out as a
//! small simulated file tree (see [`paths`]) on top of a flat [`KeyValueStore`].
//!
//! A job is split over several fragments: `metadata.json`, `columns.json`,
//! `flags.json`, the rows as `original.csv` and the flag-annotated
//! `updated.csv`. [`JobStore::put_job`] is the single write path for all of them
//! and recomputes the derived counters and status before anything is stored.
//!
//! All operations are synchronous. Nothing coordinates concurrent writers: two
//! processes saving the same job overwrite each other, last writer wins.

pub mod paths;

#[cfg(test)]
mod tests;

use crate::codec;
use crate::codec::backup::BackupDocument;
use crate::error::StoreError;
use crate::storage::KeyValueStore;
use chrono::{DateTime, SecondsFormat, Utc};
use common::model::csv::CsvTable;
use common::model::flag::Flag;
use common::model::job::{CsvJob, JobColumns, JobMetadata};
use common::model::user::{default_users, User};
use log::{debug, info, warn};
use paths::{
    Namespace, AUTH_FILE, COLUMNS_FILE, FLAGS_FILE, JOB_INDEX_FILE, METADATA_FILE,
    ORIGINAL_CSV_FILE, UPDATED_CSV_FILE, USERS_FILE,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct JobStore<S> {
    kv: S,
    ns: Namespace,
}

impl<S: KeyValueStore> JobStore<S> {
    pub fn new(kv: S, namespace: &str) -> Self {
        JobStore {
            kv,
            ns: Namespace::new(namespace),
        }
    }

    /// Seeds the default accounts and an empty job index when they are missing.
    ///
    /// Existing data is never touched, so this runs on every start.
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        if self.read(USERS_FILE)?.is_none() {
            self.write_json(USERS_FILE, &default_users())?;
            info!("Seeded default user accounts");
        }
        if self.read(JOB_INDEX_FILE)?.is_none() {
            self.write_json(JOB_INDEX_FILE, &Vec::<String>::new())?;
        }
        Ok(())
    }

    // ---- users and session ----

    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read_json(USERS_FILE)?.unwrap_or_default())
    }

    /// Logs `username` in when the credentials match a stored user exactly.
    ///
    /// A mismatch returns `None` and leaves the current session as it was.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .users()?
            .into_iter()
            .find(|u| u.username == username && u.password == password);

        match user {
            Some(user) => {
                self.write_json(AUTH_FILE, &user)?;
                info!("User '{}' logged in as {}", user.username, user.role);
                Ok(Some(user))
            }
            None => {
                warn!("Rejected login for '{}'", username);
                Ok(None)
            }
        }
    }

    pub fn current_user(&self) -> Result<Option<User>, StoreError> {
        match self.read_json(AUTH_FILE) {
            Ok(user) => Ok(user),
            Err(StoreError::JsonParse(e)) => {
                warn!("Ignoring unreadable session: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn end_session(&mut self) -> Result<(), StoreError> {
        self.erase(AUTH_FILE)
    }

    // ---- jobs ----

    /// Every indexed job in index order. Ids whose fragments are missing or
    /// unreadable are skipped.
    pub fn list_jobs(&self) -> Result<Vec<CsvJob>, StoreError> {
        let mut jobs = Vec::new();
        for id in self.job_ids()? {
            match self.get_job(&id) {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => warn!("Job '{}' is indexed but has no stored record", id),
                Err(StoreError::Storage(e)) => return Err(e.into()),
                Err(e) => warn!("Skipping job '{}': {}", id, e),
            }
        }
        Ok(jobs)
    }

    /// Reassembles a job from its fragments.
    ///
    /// Returns `None` when the metadata or the original CSV is missing. Counters
    /// and status are recomputed from the stored rows and flags.
    pub fn get_job(&self, id: &str) -> Result<Option<CsvJob>, StoreError> {
        let Some(meta) = self.read_json::<JobMetadata>(&paths::job_file(id, METADATA_FILE))? else {
            return Ok(None);
        };
        let Some(original) = self.read(&paths::job_file(id, ORIGINAL_CSV_FILE))? else {
            return Ok(None);
        };
        let columns: JobColumns = self
            .read_json(&paths::job_file(id, COLUMNS_FILE))?
            .unwrap_or_default();
        let flags: BTreeMap<usize, Flag> = self
            .read_json(&paths::job_file(id, FLAGS_FILE))?
            .unwrap_or_default();
        let table = self.parse_csv(&original)?;

        let mut job = CsvJob {
            id: id.to_string(),
            name: meta.name,
            upload_date: meta.upload_date,
            status: meta.status,
            headers: table.headers,
            data: table.rows,
            visible_columns: columns.visible_columns,
            flags,
            total_rows: meta.total_rows,
            flagged_rows: 0,
        };
        job.refresh_counters();
        Ok(Some(job))
    }

    /// Inserts or replaces a job and returns the record as stored.
    ///
    /// `total_rows`, `flagged_rows` and `status` of the argument are ignored and
    /// recomputed. Visible columns are reordered to header order. Fails without
    /// writing anything when the job breaks a store rule.
    pub fn put_job(&mut self, job: &CsvJob) -> Result<CsvJob, StoreError> {
        let job = normalize_job(job)?;
        let original = codec::csv::write(&job.headers, &job.data)?;
        let updated = self.serialize_csv_with_flag(&job)?;

        let mut ids = self.job_ids()?;
        if !ids.contains(&job.id) {
            ids.push(job.id.clone());
            self.write_json(JOB_INDEX_FILE, &ids)?;
        }

        self.write_json(&paths::job_file(&job.id, METADATA_FILE), &job.metadata())?;
        self.write_json(&paths::job_file(&job.id, COLUMNS_FILE), &job.columns())?;
        self.write_json(&paths::job_file(&job.id, FLAGS_FILE), &job.flags)?;
        self.write(&paths::job_file(&job.id, ORIGINAL_CSV_FILE), &original)?;
        self.write(&paths::job_file(&job.id, UPDATED_CSV_FILE), &updated)?;

        debug!(
            "Saved {} ({} of {} rows flagged, {})",
            job.id, job.flagged_rows, job.total_rows, job.status
        );
        Ok(job)
    }

    /// Removes `id` from the index and erases every fragment stored under
    /// `jobs/<id>/`. Returns whether the id was indexed.
    pub fn delete_job(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut ids = self.job_ids()?;
        let before = ids.len();
        ids.retain(|j| j != id);
        let was_indexed = ids.len() != before;
        if was_indexed {
            self.write_json(JOB_INDEX_FILE, &ids)?;
        }

        let dir = paths::job_dir(id);
        for key in self.namespace_keys()? {
            if self.ns.relative(&key).is_some_and(|rel| rel.starts_with(&dir)) {
                self.kv.remove(&key)?;
            }
        }

        info!("Deleted job {}", id);
        Ok(was_indexed)
    }

    /// Next `job_NNN` id, numbered from the size of the index.
    ///
    /// After deletions the count-based number can point at an id that is
    /// still in use; such numbers are skipped so an existing job is never
    /// overwritten.
    pub fn generate_job_id(&self) -> Result<String, StoreError> {
        let ids = self.job_ids()?;
        let mut number = ids.len() + 1;
        loop {
            let candidate = paths::format_job_id(number);
            if !ids.contains(&candidate) && !self.has_fragments(&candidate)? {
                return Ok(candidate);
            }
            number += 1;
        }
    }

    /// Creates a job from an uploaded file: every column visible, no flags.
    pub fn create_job_from_csv(
        &mut self,
        file_name: &str,
        text: &str,
        uploaded_at: DateTime<Utc>,
    ) -> Result<CsvJob, StoreError> {
        if !file_name.to_ascii_lowercase().ends_with(".csv") {
            return Err(StoreError::Validation(format!(
                "{} is not a CSV file",
                file_name
            )));
        }
        let name = &file_name[..file_name.len() - ".csv".len()];

        let table = self.parse_csv(text)?;
        let id = self.generate_job_id()?;
        let job = CsvJob::new(
            id,
            name,
            uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            table.headers,
            table.rows,
        );
        let job = self.put_job(&job)?;

        info!(
            "Created {} from {} with {} rows",
            job.id, file_name, job.total_rows
        );
        Ok(job)
    }

    pub fn set_visible_columns(
        &mut self,
        id: &str,
        columns: Vec<String>,
    ) -> Result<Option<CsvJob>, StoreError> {
        let Some(mut job) = self.get_job(id)? else {
            return Ok(None);
        };
        job.visible_columns = columns;
        let job = self.put_job(&job)?;
        info!("{} now shows {} of {} columns", id, job.visible_columns.len(), job.headers.len());
        Ok(Some(job))
    }

    /// Replaces the flags of a job. Rows left out of `flags` become unreviewed.
    pub fn set_flags(
        &mut self,
        id: &str,
        flags: BTreeMap<usize, Flag>,
    ) -> Result<Option<CsvJob>, StoreError> {
        let Some(mut job) = self.get_job(id)? else {
            return Ok(None);
        };
        job.flags = flags;
        self.put_job(&job).map(Some)
    }

    /// Flag-annotated CSV of a job, derived from its current flags.
    pub fn export_flagged_csv(&self, id: &str) -> Result<Option<String>, StoreError> {
        match self.get_job(id)? {
            Some(job) => self.serialize_csv_with_flag(&job).map(Some),
            None => Ok(None),
        }
    }

    // ---- codecs ----

    pub fn parse_csv(&self, text: &str) -> Result<CsvTable, StoreError> {
        codec::csv::parse(text)
    }

    pub fn serialize_csv_with_flag(&self, job: &CsvJob) -> Result<String, StoreError> {
        codec::csv::write_with_flags(job)
    }

    // ---- backup and diagnostics ----

    /// Snapshot of every fragment in the namespace.
    ///
    /// Fails with [`StoreError::JsonParse`] when a stored JSON fragment is
    /// corrupt, so a partial snapshot is never produced.
    pub fn export_backup(&self) -> Result<BackupDocument, StoreError> {
        let mut doc = BackupDocument {
            users: Some(self.users()?),
            session: self.current_user()?,
            job_index: Some(self.job_ids()?),
            jobs: BTreeMap::new(),
        };

        for key in self.namespace_keys()? {
            let Some((id, file)) = self.ns.relative(&key).and_then(paths::split_job_file) else {
                continue;
            };
            let Some(content) = self.kv.get(&key)? else {
                continue;
            };
            let known = doc
                .jobs
                .entry(id.to_string())
                .or_default()
                .insert(file, content)
                .inspect_err(|e| warn!("Backup cannot read fragment {}: {}", key, e))?;
            if !known {
                debug!("Backup skips unknown job file {}", key);
            }
        }
        doc.jobs.retain(|_, files| !files.is_empty());

        Ok(doc)
    }

    /// Replaces the whole namespace with the contents of `doc`.
    ///
    /// The document is validated and rendered before the first write, so an
    /// invalid document leaves the store untouched. The erase-then-write
    /// sequence itself is not atomic: a storage failure halfway leaves a mix of
    /// old and new fragments.
    pub fn import_backup(&mut self, doc: &BackupDocument) -> Result<(), StoreError> {
        doc.validate()?;

        let mut fragments: Vec<(String, String)> = Vec::new();
        if let Some(users) = &doc.users {
            fragments.push((USERS_FILE.to_string(), serde_json::to_string_pretty(users)?));
        }
        if let Some(session) = &doc.session {
            fragments.push((AUTH_FILE.to_string(), serde_json::to_string_pretty(session)?));
        }
        if let Some(index) = &doc.job_index {
            fragments.push((JOB_INDEX_FILE.to_string(), serde_json::to_string_pretty(index)?));
        }
        for (id, files) in &doc.jobs {
            for (file, text) in files.to_fragments()? {
                fragments.push((paths::job_file(id, file), text));
            }
        }

        for key in self.namespace_keys()? {
            self.kv.remove(&key)?;
        }
        for (path, text) in &fragments {
            self.write(path, text)?;
        }

        info!(
            "Imported backup with {} users and {} jobs",
            doc.users.as_ref().map_or(0, Vec::len),
            doc.jobs.len()
        );
        Ok(())
    }

    /// Every key in use under this store's namespace, sorted.
    pub fn list_storage_keys(&self) -> Result<Vec<String>, StoreError> {
        self.namespace_keys()
    }

    /// Raw content of one fragment, addressed by its path with or without the
    /// namespace prefix.
    pub fn read_raw(&self, path: &str) -> Result<Option<String>, StoreError> {
        let path = self.ns.relative(path).unwrap_or(path);
        self.read(path)
    }

    // ---- helpers ----

    fn job_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_json(JOB_INDEX_FILE)?.unwrap_or_default())
    }

    fn has_fragments(&self, id: &str) -> Result<bool, StoreError> {
        for file in [
            METADATA_FILE,
            COLUMNS_FILE,
            FLAGS_FILE,
            ORIGINAL_CSV_FILE,
            UPDATED_CSV_FILE,
        ] {
            if self.read(&paths::job_file(id, file))?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn namespace_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .kv
            .keys()?
            .into_iter()
            .filter(|key| self.ns.relative(key).is_some())
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn read(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self.kv.get(&self.ns.key(path))?)
    }

    fn write(&mut self, path: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.kv.set(&self.ns.key(path), value)?)
    }

    fn erase(&mut self, path: &str) -> Result<(), StoreError> {
        Ok(self.kv.remove(&self.ns.key(path))?)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        match self.read(path)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, path: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(value)?;
        self.write(path, &text)
    }
}

/// Checks a job against the store rules and returns the copy to persist.
fn normalize_job(job: &CsvJob) -> Result<CsvJob, StoreError> {
    if !paths::job_id_pattern()?.is_match(&job.id) {
        return Err(StoreError::Validation(format!("invalid job id '{}'", job.id)));
    }
    if job
        .headers
        .iter()
        .chain(job.data.iter().flatten())
        .any(|text| text.contains(['\n', '\r']))
    {
        return Err(StoreError::Validation(
            "line breaks inside CSV cells are not supported".to_string(),
        ));
    }
    if let Some(text) = job
        .headers
        .iter()
        .chain(job.data.iter().flatten())
        .find(|text| text.trim() != text.as_str())
    {
        return Err(StoreError::Validation(format!(
            "CSV cell '{}' has leading or trailing whitespace",
            text
        )));
    }
    if job.headers.is_empty() {
        return Err(StoreError::Validation("a job needs at least one header".to_string()));
    }
    if let Some(row) = job.data.iter().position(Vec::is_empty) {
        return Err(StoreError::Validation(format!("row {} has no cells", row)));
    }
    if let Some(column) = job.visible_columns.iter().find(|c| !job.headers.contains(c)) {
        return Err(StoreError::Validation(format!("unknown column '{}'", column)));
    }
    if let Some(row) = job.flags.keys().find(|&&row| row >= job.data.len()) {
        return Err(StoreError::Validation(format!(
            "flag for row {} but the job has {} rows",
            row,
            job.data.len()
        )));
    }

    let mut normalized = job.clone();
    let mut visible: Vec<String> = Vec::new();
    for header in &job.headers {
        if job.visible_columns.contains(header) && !visible.contains(header) {
            visible.push(header.clone());
        }
    }
    normalized.visible_columns = visible;
    normalized.refresh_counters();
    Ok(normalized)
}
