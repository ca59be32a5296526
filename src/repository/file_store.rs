// ==========================================
// 电机运行监测系统 - 表格文件落盘工具
// ==========================================
// 目标:
// - 读取 - 修改 - 全量写回 持有 `<file>.lock` 上的操作系统排他锁，
//   跨句柄、跨进程串行（watch 与 add/simulate 可同时运行）
// - 全量重写先写同目录唯一临时文件，再 rename 覆盖
// - 损坏文件在被覆盖前移到旁路文件，保留现场
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use fd_lock::RwLock;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 在 `<file>.lock` 排他锁内执行 `f`
///
/// 锁文件常驻，不删除（删除会让等待中的进程锁到已脱链的 inode 上）。
pub fn with_file_lock<T, F>(path: &Path, f: F) -> RepositoryResult<T>
where
    F: FnOnce() -> RepositoryResult<T>,
{
    ensure_parent(path)?;

    let lock_path = sibling_path(path, "lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| RepositoryError::LockError(format!("{}: {}", lock_path.display(), e)))?;

    let mut lock = RwLock::new(lock_file);
    let _guard = lock
        .write()
        .map_err(|e| RepositoryError::LockError(format!("{}: {}", lock_path.display(), e)))?;

    f()
}

/// 以 CSV 全量重写目标文件（唯一临时文件写完后 rename 覆盖）
pub fn rewrite_csv<F>(path: &Path, write_rows: F) -> RepositoryResult<()>
where
    F: FnOnce(&mut csv::Writer<&mut NamedTempFile>) -> RepositoryResult<()>,
{
    let dir = ensure_parent(path)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new().from_writer(&mut tmp);
        write_rows(&mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// 将损坏文件移到 `<file>.corrupt-<时间>`，返回新路径
pub fn quarantine_corrupt(path: &Path) -> RepositoryResult<PathBuf> {
    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let target = sibling_path(path, &format!("corrupt-{}", stamp));
    fs::rename(path, &target)?;
    tracing::warn!(
        from = %path.display(),
        to = %target.display(),
        "损坏文件已移至旁路文件"
    );
    Ok(target)
}

/// 创建父目录并返回它（裸文件名返回当前目录）
fn ensure_parent(path: &Path) -> RepositoryResult<&Path> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(parent)
        }
        _ => Ok(Path::new(".")),
    }
}

/// 同目录下追加后缀的兄弟文件路径: `alarms.csv` → `alarms.csv.<suffix>`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_rewrite_csv_creates_parent_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("table.csv");

        rewrite_csv(&path, |w| {
            w.write_record(["a", "b"])?;
            w.write_record(["1", "2"])?;
            Ok(())
        })
        .unwrap();
        rewrite_csv(&path, |w| {
            w.write_record(["a", "b"])?;
            Ok(())
        })
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a,b\n");
        // 目录中只剩目标文件，临时文件不残留
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_quarantine_corrupt_moves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alarms.csv");
        fs::write(&path, "garbage").unwrap();

        let moved = quarantine_corrupt(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&moved).unwrap(), "garbage");
        assert!(moved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("alarms.csv.corrupt-"));
    }

    #[test]
    fn test_file_lock_excludes_concurrent_holders() {
        let dir = TempDir::new().unwrap();
        let path = Arc::new(dir.path().join("alarms.csv"));
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let path = Arc::clone(&path);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                std::thread::spawn(move || {
                    with_file_lock(&path, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        inside.fetch_sub(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(sibling_path(&path, "lock").exists());
    }
}
