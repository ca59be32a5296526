use super::AlarmLogRepository;
use crate::domain::alarm::{AlarmRecord, GENERAL_VARIABLE};
use crate::domain::reading::{Reading, ScoredReading};
use crate::domain::types::{AlarmLevel, AlarmStatus, ProbableCause, RiskLabel};
use crate::repository::error::RepositoryError;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use tempfile::TempDir;

fn ts(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn scored(risk: RiskLabel, cause: ProbableCause) -> ScoredReading {
    ScoredReading {
        reading: Reading::new(12.0, 150.0, 85.0, 60.0),
        risk,
        cause,
        anomaly_score: 0.5,
    }
}

fn setup() -> (TempDir, AlarmLogRepository) {
    let dir = TempDir::new().unwrap();
    let repo = AlarmLogRepository::new(dir.path().join("alarms.csv"));
    (dir, repo)
}

#[test]
fn test_missing_log_is_empty_without_warning() {
    let (_dir, repo) = setup();
    let history = repo.read_all();
    assert!(history.data.is_empty());
    assert!(history.is_clean());
}

#[test]
fn test_record_appends_only_risk_rows() {
    let (_dir, repo) = setup();
    let batch = vec![
        scored(RiskLabel::Risk, ProbableCause::ElectricalOverload),
        scored(RiskLabel::Normal, ProbableCause::NoAnomaly),
        scored(RiskLabel::Risk, ProbableCause::Unclassified),
    ];

    let appended = repo.record(&batch, ts(8)).unwrap();
    assert_eq!(appended.data, 2);

    let history = repo.read_all();
    assert!(history.is_clean());
    assert_eq!(history.data.len(), 2);
    assert_eq!(history.data[0].variable, "current (A)");
    assert_eq!(history.data[0].description, "possible electrical overload");
    assert_eq!(history.data[0].level, AlarmLevel::High);
    assert_eq!(history.data[0].status, AlarmStatus::Pending);
    assert_eq!(history.data[0].timestamp, ts(8));
    assert_eq!(history.data[1].variable, GENERAL_VARIABLE);
}

#[test]
fn test_record_preserves_previous_history_in_order() {
    let (_dir, repo) = setup();
    repo.record(&[scored(RiskLabel::Risk, ProbableCause::Overheating)], ts(8))
        .unwrap();
    let before = repo.read_all().data;

    repo.record(
        &[
            scored(RiskLabel::Risk, ProbableCause::LowPressureLeak),
            scored(RiskLabel::Risk, ProbableCause::ElevatedTorque),
        ],
        ts(9),
    )
    .unwrap();

    let after = repo.read_all().data;
    assert_eq!(after.len(), before.len() + 2);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(after[1].description, "low pressure — possible leak");
    assert_eq!(after[2].description, "elevated torque — possible friction");
}

#[test]
fn test_record_without_risk_does_not_create_file() {
    let (_dir, repo) = setup();
    let appended = repo
        .record(&[scored(RiskLabel::Normal, ProbableCause::NoAnomaly)], ts(8))
        .unwrap();
    assert_eq!(appended.data, 0);
    assert!(!repo.path().exists());
}

#[test]
fn test_corrupt_log_reads_as_empty_with_warning() {
    let (dir, repo) = setup();
    fs::write(dir.path().join("alarms.csv"), "timestamp,variable\nnot-a-date,x\n").unwrap();

    let history = repo.read_all();
    assert!(history.data.is_empty());
    assert_eq!(history.warnings.len(), 1);
    assert!(matches!(history.warnings[0], RepositoryError::LogUnavailable { .. }));
}

#[test]
fn test_record_over_corrupt_log_keeps_backup() {
    let (dir, repo) = setup();
    fs::write(dir.path().join("alarms.csv"), "%%% garbage %%%").unwrap();

    let appended = repo
        .record(&[scored(RiskLabel::Risk, ProbableCause::Overheating)], ts(10))
        .unwrap();
    assert_eq!(appended.data, 1);
    assert_eq!(appended.warnings.len(), 1);

    let history = repo.read_all();
    assert!(history.is_clean());
    assert_eq!(history.data.len(), 1);

    let backups = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("alarms.csv.corrupt-"))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_reads_legacy_spanish_log() {
    let (dir, repo) = setup();
    fs::write(
        dir.path().join("alarms.csv"),
        "Fecha_Hora,Variable,Nivel,Descripción,Estado\n\
         2024-11-02 10:00:00,Temperatura_aceite (°C),Alta,Temperatura alta — riesgo de sobrecalentamiento,Pendiente\n",
    )
    .unwrap();

    let history = repo.read_all();
    assert!(history.is_clean());
    assert_eq!(history.data.len(), 1);
    assert_eq!(history.data[0].level, AlarmLevel::High);
    assert_eq!(history.data[0].status, AlarmStatus::Pending);
}

#[test]
fn test_level_distribution_and_pending_count() {
    let (_dir, repo) = setup();
    let mut medium = AlarmRecord::from_cause(ProbableCause::ElevatedTorque, ts(7));
    medium.level = AlarmLevel::Medium;
    medium.status = AlarmStatus::Resolved;

    repo.append(vec![
        AlarmRecord::from_cause(ProbableCause::ElectricalOverload, ts(6)),
        medium,
    ])
    .unwrap();

    let dist = repo.level_distribution().data;
    assert_eq!(dist.get(&AlarmLevel::High), Some(&1));
    assert_eq!(dist.get(&AlarmLevel::Medium), Some(&1));
    assert_eq!(repo.pending_count().data, 1);
}

#[test]
fn test_concurrent_appends_do_not_lose_alarms() {
    use std::sync::Arc;

    let (_dir, repo) = setup();
    let repo = Arc::new(repo);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                repo.record(&[scored(RiskLabel::Risk, ProbableCause::Unclassified)], ts(i))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(repo.read_all().data.len(), 8);
}
