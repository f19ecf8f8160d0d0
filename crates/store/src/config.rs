use std::path::PathBuf;
use std::sync::OnceLock;

static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();

// 未显式注入时的默认数据目录
const DEFAULT_ROOT: &str = "data";

/// # Summary
/// 注入存储层的数据根目录，进程内只生效一次。
///
/// # Logic
/// 1. 将路径写入全局 `OnceLock`。
/// 2. 重复调用不会覆盖首次注入的值。
///
/// # Arguments
/// * `path` - 数据根目录（`gold.db` / `app.db` 的父目录）。
pub fn set_root_dir(path: PathBuf) {
    let _ = ROOT_DIR.set(path);
}

/// 读取数据根目录，未注入时回落到默认值 `data`。
pub(crate) fn get_root_dir() -> PathBuf {
    ROOT_DIR
        .get()
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
}
