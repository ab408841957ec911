//! SQLite-backed store.
//!
//! Subjects keep their roster denormalized as a JSON array in a TEXT
//! column, mirroring the document shape the JSON backend persists; classes
//! and activities get their own tables.

use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, ActivityFilter, Store};
use crate::error::StoreError;
use crate::model::{ActivityKind, Class, PresentationSession, Student, StudentActivity, Subject};

fn parse_activity_kind(kind_str: &str) -> ActivityKind {
    match kind_str {
        "feedback" => ActivityKind::Feedback,
        _ => ActivityKind::Presentation,
    }
}

fn row_to_activity(row: &rusqlite::Row) -> Result<StudentActivity, rusqlite::Error> {
    let kind_str: String = row.get(4)?;
    Ok(StudentActivity {
        id: row.get(0)?,
        student_id: row.get(1)?,
        class_id: row.get(2)?,
        subject_id: row.get(3)?,
        activity_type: parse_activity_kind(&kind_str),
        timestamp: row.get(5)?,
        class_name: row.get(6)?,
        subject_name: row.get(7)?,
    })
}

/// SQLite database at `~/.config/showcase/showcase.db`.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database, creating file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::OpenFailed {
                path: "~/.config/showcase".into(),
                message: e.to_string(),
            })?
            .join("showcase.db");
        let conn = Connection::open(&path).map_err(|e| StoreError::OpenFailed {
            path,
            message: e.to_string(),
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::OpenFailed {
            path: ":memory:".into(),
            message: e.to_string(),
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS subjects (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                teacher_id TEXT NOT NULL,
                students   TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS classes (
                id              TEXT PRIMARY KEY,
                subject_id      TEXT NOT NULL,
                name            TEXT NOT NULL,
                last_session_ts INTEGER
            );

            CREATE TABLE IF NOT EXISTS sessions (
                class_id TEXT PRIMARY KEY,
                data     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                id            TEXT PRIMARY KEY,
                student_id    TEXT NOT NULL,
                class_id      TEXT NOT NULL,
                subject_id    TEXT NOT NULL,
                activity_type TEXT NOT NULL,
                timestamp     INTEGER NOT NULL,
                class_name    TEXT,
                subject_name  TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_classes_subject ON classes(subject_id);
            CREATE INDEX IF NOT EXISTS idx_activities_student ON activities(student_id);
            CREATE INDEX IF NOT EXISTS idx_activities_subject ON activities(subject_id);",
        )?;
        Ok(())
    }

    fn load_subject_row(&self, subject_id: &str) -> Result<Option<Subject>, StoreError> {
        let row: Option<(String, String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, name, teacher_id, students FROM subjects WHERE id = ?1",
                params![subject_id],
                |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                },
            )
            .optional()?;

        let Some((id, name, teacher_id, students_json)) = row else {
            return Ok(None);
        };

        let students: Vec<Student> = serde_json::from_str(&students_json)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, name, last_session_ts FROM classes WHERE subject_id = ?1 ORDER BY name",
        )?;
        let classes = stmt
            .query_map(params![id], |row| {
                Ok(Class {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    last_session_timestamp: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Subject {
            id,
            name,
            teacher_id,
            classes,
            students,
        }))
    }

    fn save_roster(&self, subject_id: &str, students: &[Student]) -> Result<(), StoreError> {
        let json = serde_json::to_string(students)?;
        let updated = self.conn.execute(
            "UPDATE subjects SET students = ?1 WHERE id = ?2",
            params![json, subject_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                kind: "subject",
                id: subject_id.to_string(),
            });
        }
        Ok(())
    }
}

impl Store for SqliteStore {
    fn subjects_for_owner(&self, owner_id: &str) -> Result<Vec<Subject>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM subjects WHERE teacher_id = ?1 ORDER BY name")?;
        let ids = stmt
            .query_map(params![owner_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut subjects = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(subject) = self.load_subject_row(&id)? {
                subjects.push(subject);
            }
        }
        Ok(subjects)
    }

    fn subject(&self, subject_id: &str) -> Result<Subject, StoreError> {
        self.load_subject_row(subject_id)?
            .ok_or_else(|| StoreError::NotFound {
                kind: "subject",
                id: subject_id.to_string(),
            })
    }

    fn add_subject(&mut self, subject: &Subject) -> Result<(), StoreError> {
        let students = serde_json::to_string(&subject.students)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO subjects (id, name, teacher_id, students)
             VALUES (?1, ?2, ?3, ?4)",
            params![subject.id, subject.name, subject.teacher_id, students],
        )?;
        for class in &subject.classes {
            self.add_class(&subject.id, class)?;
        }
        Ok(())
    }

    fn remove_subject(&mut self, subject_id: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM classes WHERE subject_id = ?1",
            params![subject_id],
        )?;
        self.conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![subject_id])?;
        Ok(())
    }

    fn add_class(&mut self, subject_id: &str, class: &Class) -> Result<(), StoreError> {
        // Subject must exist; classes never dangle at write time.
        let _ = self.subject(subject_id)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO classes (id, subject_id, name, last_session_ts)
             VALUES (?1, ?2, ?3, ?4)",
            params![class.id, subject_id, class.name, class.last_session_timestamp],
        )?;
        Ok(())
    }

    fn remove_class(&mut self, _subject_id: &str, class_id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM classes WHERE id = ?1", params![class_id])?;
        Ok(())
    }

    fn update_class_timestamp(
        &mut self,
        _subject_id: &str,
        class_id: &str,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        let updated = self.conn.execute(
            "UPDATE classes SET last_session_ts = ?1 WHERE id = ?2",
            params![timestamp, class_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                kind: "class",
                id: class_id.to_string(),
            });
        }
        Ok(())
    }

    fn add_student_to_subject(
        &mut self,
        subject_id: &str,
        student: &Student,
    ) -> Result<(), StoreError> {
        let subject = self.subject(subject_id)?;
        let mut students = subject.students;
        // Duplicate enrollment is a no-op.
        if !students.iter().any(|s| s.id == student.id) {
            students.push(student.clone());
        }
        self.save_roster(subject_id, &students)
    }

    fn remove_student_from_subject(
        &mut self,
        subject_id: &str,
        student_id: &str,
    ) -> Result<(), StoreError> {
        let subject = self.subject(subject_id)?;
        let students: Vec<Student> = subject
            .students
            .into_iter()
            .filter(|s| s.id != student_id)
            .collect();
        self.save_roster(subject_id, &students)
    }

    fn get_session(&self, class_id: &str) -> Result<Option<PresentationSession>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM sessions WHERE class_id = ?1",
                params![class_id],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save_session(&mut self, session: &PresentationSession) -> Result<(), StoreError> {
        // Absent optional fields are omitted from the document entirely.
        let json = serde_json::to_string(session)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO sessions (class_id, data) VALUES (?1, ?2)",
            params![session.class_id, json],
        )?;
        Ok(())
    }

    fn clear_session(&mut self, class_id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM sessions WHERE class_id = ?1", params![class_id])?;
        Ok(())
    }

    fn append_activity(&mut self, activity: &StudentActivity) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO activities
             (id, student_id, class_id, subject_id, activity_type, timestamp, class_name, subject_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                activity.id,
                activity.student_id,
                activity.class_id,
                activity.subject_id,
                activity.activity_type.as_str(),
                activity.timestamp,
                activity.class_name,
                activity.subject_name,
            ],
        )?;
        Ok(())
    }

    fn activities(&self, filter: &ActivityFilter) -> Result<Vec<StudentActivity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, student_id, class_id, subject_id, activity_type, timestamp,
                    class_name, subject_name
             FROM activities ORDER BY timestamp",
        )?;
        let all = stmt
            .query_map([], row_to_activity)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(all.into_iter().filter(|a| filter.matches(a)).collect())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now_millis;

    fn subject_with_roster() -> Subject {
        let mut subject = Subject::new("Rhetoric", "teacher-1");
        subject.students.push(Student::new("Ada"));
        subject.students.push(Student::new("Ben"));
        subject.classes.push(Class::new("Group A"));
        subject
    }

    #[test]
    fn subject_roundtrip() {
        let mut store = SqliteStore::open_memory().unwrap();
        let subject = subject_with_roster();
        store.add_subject(&subject).unwrap();

        let loaded = store.subject(&subject.id).unwrap();
        assert_eq!(loaded.name, "Rhetoric");
        assert_eq!(loaded.students.len(), 2);
        assert_eq!(loaded.classes.len(), 1);

        let owned = store.subjects_for_owner("teacher-1").unwrap();
        assert_eq!(owned.len(), 1);
        assert!(store.subjects_for_owner("someone-else").unwrap().is_empty());

        store.remove_subject(&subject.id).unwrap();
        assert!(matches!(
            store.subject(&subject.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn duplicate_enrollment_is_noop() {
        let mut store = SqliteStore::open_memory().unwrap();
        let subject = subject_with_roster();
        store.add_subject(&subject).unwrap();

        let ada = subject.students[0].clone();
        store.add_student_to_subject(&subject.id, &ada).unwrap();
        assert_eq!(store.subject(&subject.id).unwrap().students.len(), 2);

        store
            .remove_student_from_subject(&subject.id, &ada.id)
            .unwrap();
        assert_eq!(store.subject(&subject.id).unwrap().students.len(), 1);
    }

    #[test]
    fn session_roundtrip_preserves_optional_fields() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(store.get_session("c1").unwrap().is_none());

        let mut session = PresentationSession::new("c1");
        session.current_presenter = Some(Student::new("Ada"));
        store.save_session(&session).unwrap();
        assert_eq!(store.get_session("c1").unwrap().unwrap(), session);

        session.current_presenter = None;
        store.save_session(&session).unwrap();
        let loaded = store.get_session("c1").unwrap().unwrap();
        assert!(loaded.current_presenter.is_none());

        store.clear_session("c1").unwrap();
        assert!(store.get_session("c1").unwrap().is_none());
    }

    #[test]
    fn activities_filterable() {
        let mut store = SqliteStore::open_memory().unwrap();
        let ts = now_millis();
        for (student, kind) in [
            ("s1", ActivityKind::Presentation),
            ("s1", ActivityKind::Feedback),
            ("s2", ActivityKind::Presentation),
        ] {
            store
                .append_activity(&StudentActivity {
                    id: crate::model::generate_id(),
                    student_id: student.into(),
                    class_id: "c1".into(),
                    subject_id: "sub1".into(),
                    activity_type: kind,
                    timestamp: ts,
                    class_name: Some("Group A".into()),
                    subject_name: Some("Rhetoric".into()),
                })
                .unwrap();
        }

        assert_eq!(store.activities(&ActivityFilter::default()).unwrap().len(), 3);
        let s1_only = store
            .activities(&ActivityFilter {
                student_id: Some("s1".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(s1_only.len(), 2);
        let presentations = store
            .activities(&ActivityFilter {
                activity_type: Some(ActivityKind::Presentation),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(presentations.len(), 2);
    }

    #[test]
    fn class_timestamp_updates() {
        let mut store = SqliteStore::open_memory().unwrap();
        let subject = subject_with_roster();
        store.add_subject(&subject).unwrap();
        let class_id = subject.classes[0].id.clone();

        store
            .update_class_timestamp(&subject.id, &class_id, 1_234)
            .unwrap();
        let loaded = store.subject(&subject.id).unwrap();
        assert_eq!(loaded.classes[0].last_session_timestamp, Some(1_234));

        assert!(matches!(
            store.update_class_timestamp(&subject.id, "missing", 1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn kv_store() {
        let mut store = SqliteStore::open_memory().unwrap();
        assert!(store.kv_get("test").unwrap().is_none());
        store.kv_set("test", "hello").unwrap();
        assert_eq!(store.kv_get("test").unwrap().unwrap(), "hello");
    }
}
