// ==========================================
// 读数表仓储集成测试
// ==========================================
// 测试目标: 回退样本、区域格式、旧版表头、追加写回、损坏文件旁路
// ==========================================


use motor_monitor::domain::Reading;
use motor_monitor::importer::builtin_sample;
use motor_monitor::repository::{ReadingRepository, RepositoryError};
use std::sync::Arc;
use test_helpers::{fixed_time, fixture_path, TestWorkspace};

#[test]
fn test_missing_table_yields_builtin_sample() {
    let ws = TestWorkspace::new();
    let repo = ReadingRepository::new(&ws.readings_path);

    let loaded = repo.load();
    assert_eq!(loaded.data.len(), 10);
    assert_eq!(loaded.data, builtin_sample());
    assert!(matches!(
        loaded.warnings.as_slice(),
        [RepositoryError::SourceUnavailable { .. }]
    ));
    assert!(loaded.warnings[0].is_degraded());
}

#[test]
fn test_semicolon_table_with_decimal_commas() {
    let ws = TestWorkspace::new();
    ws.write_table(
        "current (A);torque (N·m);hydraulic_pressure (bar);oil_temperature (°C)\n\
         18,5;160,4;90,2;68,4\n\
         10,8;138,5;82,1;42,0\n",
    );

    let loaded = ReadingRepository::new(&ws.readings_path).load();
    assert!(loaded.is_clean());
    assert_eq!(
        loaded.data,
        vec![
            Reading::new(18.5, 160.4, 90.2, 68.4),
            Reading::new(10.8, 138.5, 82.1, 42.0)
        ]
    );
}

#[test]
fn test_legacy_spanish_headers_with_timestamp() {
    let ws = TestWorkspace::new();
    ws.write_table(
        "Fecha_Hora,Corriente_motor (A),Torque (Nm),Presión_hidráulica (bar),Temperatura_aceite (°C)\n\
         2025-01-15 08:00:00,12.1,148.2,85.4,58.3\n",
    );

    let loaded = ReadingRepository::new(&ws.readings_path).load();
    assert!(loaded.is_clean());
    assert_eq!(
        loaded.data,
        vec![Reading::new(12.1, 148.2, 85.4, 58.3).with_timestamp(fixed_time(8))]
    );
}

#[test]
fn test_unparseable_and_negative_cells_are_missing() {
    let ws = TestWorkspace::new();
    ws.write_table(
        "current (A),torque (N·m),hydraulic_pressure (bar),oil_temperature (°C)\n\
         n/a,150,-3,60\n\
         ,,,\n",
    );

    let loaded = ReadingRepository::new(&ws.readings_path).load();
    assert!(loaded.is_clean());
    assert_eq!(loaded.data.len(), 1);
    let row = loaded.data[0];
    assert_eq!(row.current_a, None);
    assert_eq!(row.torque_nm, Some(150.0));
    assert_eq!(row.hydraulic_pressure_bar, None);
    assert_eq!(row.oil_temperature_c, Some(60.0));
}

#[test]
fn test_unrecognised_table_falls_back_with_warning() {
    let ws = TestWorkspace::new();
    ws.write_table("alpha,beta\n1,2\n");

    let loaded = ReadingRepository::new(&ws.readings_path).load();
    assert_eq!(loaded.data, builtin_sample());
    assert!(matches!(
        loaded.warnings.as_slice(),
        [RepositoryError::SourceUnavailable { .. }]
    ));
}

#[test]
fn test_append_keeps_existing_rows_in_order() {
    let ws = TestWorkspace::new();
    let repo = ReadingRepository::new(&ws.readings_path);
    repo.write_snapshot(&[Reading::new(12.0, 150.0, 85.0, 60.0)])
        .unwrap();

    let first = repo.append(Reading::new(13.0, 151.0, 84.0, 61.0)).unwrap();
    assert!(first.is_clean());
    assert_eq!(first.data, 2);

    let second = repo
        .append_many(&[
            Reading::new(14.0, 152.0, 83.0, 62.0),
            Reading::new(15.0, 153.0, 82.0, 63.0),
        ])
        .unwrap();
    assert_eq!(second.data, 4);

    let currents: Vec<Option<f64>> = repo.load().data.iter().map(|r| r.current_a).collect();
    assert_eq!(
        currents,
        vec![Some(12.0), Some(13.0), Some(14.0), Some(15.0)]
    );
}

#[test]
fn test_corrupt_table_backed_up_before_rewrite() {
    let ws = TestWorkspace::new();
    ws.write_table("no sensor columns here\n???\n");
    let repo = ReadingRepository::new(&ws.readings_path);

    let result = repo.append(Reading::new(12.0, 150.0, 85.0, 60.0)).unwrap();
    assert_eq!(result.data, 11);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(ws.count_files_with_prefix("readings.csv.corrupt-"), 1);
    assert!(repo.load().is_clean());
}

#[test]
fn test_excel_workbook_first_sheet_is_loaded() {
    // 西语表头；第二行含小数逗号文本单元格；第三行扭矩为空；第二张工作表为备注
    let repo = ReadingRepository::new(fixture_path("readings.xlsx"));

    let loaded = repo.load();
    assert!(loaded.is_clean(), "unexpected warnings: {:?}", loaded.warnings);
    assert_eq!(
        loaded.data,
        vec![
            Reading::new(12.1, 148.2, 85.4, 58.3).with_timestamp(fixed_time(8)),
            Reading::new(18.5, 160.4, 90.2, 68.4).with_timestamp(fixed_time(9)),
            Reading {
                torque_nm: None,
                ..Reading::new(10.8, 0.0, 82.1, 42.0).with_timestamp(fixed_time(10))
            },
        ]
    );
}

#[test]
fn test_excel_table_is_read_only() {
    let ws = TestWorkspace::new();
    let repo = ReadingRepository::new(ws.dir.path().join("plant.xlsx"));

    let err = repo.append(Reading::new(12.0, 150.0, 85.0, 60.0)).unwrap_err();
    assert!(matches!(err, RepositoryError::FileWriteError(_)));
    assert!(!ws.dir.path().join("plant.xlsx").exists());
}

#[test]
fn test_concurrent_appends_are_serialised() {
    let ws = TestWorkspace::new();
    let repo = Arc::new(ReadingRepository::new(&ws.readings_path));
    repo.write_snapshot(&[]).unwrap();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                repo.append(Reading::new(10.0 + i as f64, 150.0, 85.0, 60.0))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(repo.load().data.len(), 6);
}

#[test]
fn test_independent_handles_serialise_appends() {
    let ws = TestWorkspace::new();
    ReadingRepository::new(&ws.readings_path)
        .write_snapshot(&[])
        .unwrap();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let path = ws.readings_path.clone();
            std::thread::spawn(move || {
                let repo = ReadingRepository::new(path);
                for j in 0..5 {
                    repo.append(Reading::new(10.0 + i as f64, 150.0 + j as f64, 85.0, 60.0))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let loaded = ReadingRepository::new(&ws.readings_path).load();
    assert!(loaded.is_clean());
    assert_eq!(loaded.data.len(), 30);
}
