//! Directory-backed record store.
//!
//! Each list kind lives in its own JSON Lines file; appends take an exclusive
//! lock and write a single line. Upserts and deletes rewrite the whole file
//! through a temp file that is synced and renamed over the original. The
//! profile and plan singletons are plain JSON documents written the same way.
//!
//! Reads never fail on bad content: malformed lines are logged and skipped,
//! and a malformed singleton reads as absent. A rewrite only keeps the lines
//! that parsed, so the next upsert or delete drops skipped lines for good; the
//! rewrite logs how many it dropped.

use crate::store::{remove_where, upsert_by_date, RecordStore};
use crate::{
    Challenge, Config, CustomFood, Error, FoodLog, Friend, Result, StepLog, UserProfile, WaterLog,
    WorkoutLog, WorkoutPlan,
};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const STEPS_FILE: &str = "steps.jsonl";
const FOOD_FILE: &str = "food.jsonl";
const WATER_FILE: &str = "water.jsonl";
const WORKOUTS_FILE: &str = "workouts.jsonl";
const CUSTOM_FOODS_FILE: &str = "custom_foods.jsonl";
const CHALLENGES_FILE: &str = "challenges.jsonl";
const FRIENDS_FILE: &str = "friends.jsonl";
const PROFILE_FILE: &str = "profile.json";
const PLAN_FILE: &str = "plan.json";

/// JSON Lines store rooted at a data directory
#[derive(Clone, Debug)]
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    /// Open (and create if needed) a store in `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Opened record store at {:?}", dir);
        Ok(Self { dir })
    }

    /// Open the store in the configured data directory
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.data.data_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// Read every well-formed record from a JSON Lines file
fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_lines_counting(path).map(|(records, _)| records)
}

/// Records that parsed, plus the number of non-blank lines that did not
fn read_lines_counting<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    if !path.exists() {
        return Ok((Vec::new(), 0));
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();
    let mut skipped = 0;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read {:?} at line {}: {}", path, line_num + 1, e);
                skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record in {:?} at line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
                skipped += 1;
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok((records, skipped))
}

fn ends_without_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Append a single record as one JSON line under an exclusive lock
fn append_line<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;
    file.lock_exclusive()?;

    // A torn last line from an interrupted write must not swallow this record.
    let torn = ends_without_newline(&mut file)?;

    let mut writer = std::io::BufWriter::new(&file);
    if torn {
        writer.write_all(b"\n")?;
    }
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    file.unlock()?;
    tracing::debug!("Appended record to {:?}", path);
    Ok(())
}

/// Write `contents` to a synced temp file and rename it over `path`
fn replace_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", path)))?;
    let temp = NamedTempFile::new_in(parent)?;

    temp.as_file().lock_exclusive()?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Rewrite a JSON Lines file with exactly `records`
/// Replace the file with `records`; `dropped` is how many unparsed lines go with it
fn rewrite_lines<T: Serialize>(path: &Path, records: &[T], dropped: usize) -> Result<()> {
    if dropped > 0 {
        tracing::warn!(
            "Rewriting {:?} drops {} malformed line(s) for good",
            path,
            dropped
        );
    }
    let mut buf = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buf, record)?;
        buf.push(b'\n');
    }
    replace_atomically(path, &buf)?;
    tracing::debug!("Rewrote {:?} with {} records", path, records.len());
    Ok(())
}

/// Load a singleton document; missing or unreadable reads as `None`
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Treating as absent.", path, e);
            return Ok(None);
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Treating as absent.", path, e);
        return Ok(None);
    }

    let mut contents = String::new();
    let read = BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    if let Err(e) = read {
        tracing::warn!("Failed to read {:?}: {}. Treating as absent.", path, e);
        return Ok(None);
    }

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Treating as absent.", path, e);
            Ok(None)
        }
    }
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_vec(value)?;
    replace_atomically(path, &contents)?;
    tracing::debug!("Saved {:?}", path);
    Ok(())
}

impl RecordStore for JsonlStore {
    fn profile(&self) -> Result<Option<UserProfile>> {
        read_document(&self.path(PROFILE_FILE))
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        write_document(&self.path(PROFILE_FILE), profile)
    }

    fn step_logs(&self) -> Result<Vec<StepLog>> {
        read_lines(&self.path(STEPS_FILE))
    }

    fn save_step_log(&mut self, log: StepLog) -> Result<StepLog> {
        let path = self.path(STEPS_FILE);
        let (mut logs, dropped) = read_lines_counting(&path)?;
        let stored = upsert_by_date(&mut logs, log);
        rewrite_lines(&path, &logs, dropped)?;
        Ok(stored)
    }

    fn food_logs(&self) -> Result<Vec<FoodLog>> {
        read_lines(&self.path(FOOD_FILE))
    }

    fn append_food_log(&mut self, log: &FoodLog) -> Result<()> {
        append_line(&self.path(FOOD_FILE), log)
    }

    fn delete_food_log(&mut self, id: Uuid) -> Result<bool> {
        let path = self.path(FOOD_FILE);
        let (mut logs, dropped): (Vec<FoodLog>, usize) = read_lines_counting(&path)?;
        if !remove_where(&mut logs, |l| l.id == id) {
            return Ok(false);
        }
        rewrite_lines(&path, &logs, dropped)?;
        Ok(true)
    }

    fn water_logs(&self) -> Result<Vec<WaterLog>> {
        read_lines(&self.path(WATER_FILE))
    }

    fn save_water_log(&mut self, log: WaterLog) -> Result<WaterLog> {
        let path = self.path(WATER_FILE);
        let (mut logs, dropped) = read_lines_counting(&path)?;
        let stored = upsert_by_date(&mut logs, log);
        rewrite_lines(&path, &logs, dropped)?;
        Ok(stored)
    }

    fn workout_logs(&self) -> Result<Vec<WorkoutLog>> {
        read_lines(&self.path(WORKOUTS_FILE))
    }

    fn append_workout_log(&mut self, log: &WorkoutLog) -> Result<()> {
        append_line(&self.path(WORKOUTS_FILE), log)
    }

    fn delete_workout_log(&mut self, id: Uuid) -> Result<bool> {
        let path = self.path(WORKOUTS_FILE);
        let (mut logs, dropped): (Vec<WorkoutLog>, usize) = read_lines_counting(&path)?;
        if !remove_where(&mut logs, |l| l.id == id) {
            return Ok(false);
        }
        rewrite_lines(&path, &logs, dropped)?;
        Ok(true)
    }

    fn custom_foods(&self) -> Result<Vec<CustomFood>> {
        read_lines(&self.path(CUSTOM_FOODS_FILE))
    }

    fn append_custom_food(&mut self, food: &CustomFood) -> Result<()> {
        append_line(&self.path(CUSTOM_FOODS_FILE), food)
    }

    fn challenges(&self) -> Result<Vec<Challenge>> {
        read_lines(&self.path(CHALLENGES_FILE))
    }

    fn append_challenge(&mut self, challenge: &Challenge) -> Result<()> {
        append_line(&self.path(CHALLENGES_FILE), challenge)
    }

    fn update_challenge(&mut self, challenge: &Challenge) -> Result<bool> {
        let path = self.path(CHALLENGES_FILE);
        let (mut challenges, dropped): (Vec<Challenge>, usize) = read_lines_counting(&path)?;
        match challenges.iter_mut().find(|c| c.id == challenge.id) {
            Some(existing) => *existing = challenge.clone(),
            None => return Ok(false),
        }
        rewrite_lines(&path, &challenges, dropped)?;
        Ok(true)
    }

    fn friends(&self) -> Result<Vec<Friend>> {
        read_lines(&self.path(FRIENDS_FILE))
    }

    fn append_friend(&mut self, friend: &Friend) -> Result<()> {
        append_line(&self.path(FRIENDS_FILE), friend)
    }

    fn workout_plan(&self) -> Result<Option<WorkoutPlan>> {
        read_document(&self.path(PLAN_FILE))
    }

    fn save_workout_plan(&mut self, plan: &WorkoutPlan) -> Result<()> {
        write_document(&self.path(PLAN_FILE), plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn food(name: &str, calories: u32) -> FoodLog {
        FoodLog {
            id: Uuid::new_v4(),
            date: date("2024-01-01"),
            name: name.into(),
            calories,
            protein: 1.0,
            carbs: 2.0,
            fat: 3.0,
            meal_type: crate::MealType::Lunch,
            serving_size: 1.0,
        }
    }

    #[test]
    fn test_append_and_read_food() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(temp_dir.path()).unwrap();

        let log = food("Apple", 95);
        store.append_food_log(&log).unwrap();
        store.append_food_log(&food("Banana", 105)).unwrap();

        let logs = store.food_logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0], log);
    }

    #[test]
    fn test_delete_rewrites_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(temp_dir.path()).unwrap();

        let keep = food("Apple", 95);
        let gone = food("Banana", 105);
        store.append_food_log(&keep).unwrap();
        store.append_food_log(&gone).unwrap();

        assert!(store.delete_food_log(gone.id).unwrap());
        assert!(!store.delete_food_log(gone.id).unwrap());
        assert_eq!(store.food_logs().unwrap(), vec![keep]);
    }

    #[test]
    fn test_rewrite_counts_and_drops_malformed_lines() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(temp_dir.path()).unwrap();
        let keep = food("Apple", 95);
        let gone = food("Banana", 105);
        store.append_food_log(&keep).unwrap();
        std::fs::write(
            store.path(FOOD_FILE),
            format!(
                "{}\n{{ not a food log }}\n\n{}\n",
                serde_json::to_string(&keep).unwrap(),
                serde_json::to_string(&gone).unwrap()
            ),
        )
        .unwrap();

        let (logs, skipped): (Vec<FoodLog>, usize) =
            read_lines_counting(&store.path(FOOD_FILE)).unwrap();
        assert_eq!((logs.len(), skipped), (2, 1));

        assert!(store.delete_food_log(gone.id).unwrap());
        let contents = std::fs::read_to_string(store.path(FOOD_FILE)).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(!contents.contains("not a food log"));
        assert_eq!(store.food_logs().unwrap(), vec![keep]);
    }

    #[test]
    fn test_upsert_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonlStore::open(temp_dir.path()).unwrap();
            for glasses in [3, 8] {
                store
                    .save_water_log(WaterLog {
                        id: Uuid::new_v4(),
                        date: date("2024-01-01"),
                        glasses,
                    })
                    .unwrap();
            }
        }

        let store = JsonlStore::open(temp_dir.path()).unwrap();
        let logs = store.water_logs().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].glasses, 8);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(temp_dir.path()).unwrap();
        store.append_food_log(&food("Apple", 95)).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(temp_dir.path().join(FOOD_FILE))
            .unwrap();
        writeln!(file, "{{ not json").unwrap();
        writeln!(file, r#"{{"id":"x"}}"#).unwrap();
        drop(file);

        store.append_food_log(&food("Banana", 105)).unwrap();

        let names: Vec<_> = store.food_logs().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_corrupted_profile_reads_as_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(PROFILE_FILE), "{ invalid json }}}").unwrap();

        let store = JsonlStore::open(temp_dir.path()).unwrap();
        assert!(store.profile().unwrap().is_none());
    }

    #[test]
    fn test_profile_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(temp_dir.path()).unwrap();

        let mut profile = UserProfile::default();
        profile.points = 130;
        store.save_profile(&profile).unwrap();

        assert_eq!(store.profile().unwrap(), Some(profile));
    }

    #[test]
    fn test_missing_files_read_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::open(temp_dir.path().join("fresh")).unwrap();
        assert!(store.step_logs().unwrap().is_empty());
        assert!(store.challenges().unwrap().is_empty());
        assert!(store.workout_plan().unwrap().is_none());
    }
}
