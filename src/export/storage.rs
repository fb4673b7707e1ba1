//! 存储模块
//!
//! 导出结果的落盘抽象。写入先进入暂存目标，提交时原子地改名到最终位置，
//! 读取方看到的要么是完整文件要么什么都没有；失败或取消时丢弃暂存目标，
//! 已存在的旧文件保持不变。

use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use tempfile::NamedTempFile;

use crate::export::error::{ExportError, Result};

/// 暂存写入目标
///
/// 通过`commit`原子地发布为最终文件，或通过`discard`丢弃。
/// 两者都未调用就析构时等同于丢弃。
pub trait StagedFile: Write + Seek {
    /// 提交：将暂存内容原子地改名到最终位置
    fn commit(self: Box<Self>) -> Result<()>;

    /// 丢弃：删除暂存内容，最终位置不受影响
    fn discard(self: Box<Self>);
}

/// 存储接口
///
/// 文件按调用方提供的名字寻址，位于实现方管理的根位置之下。
pub trait Storage {
    /// 开始一次原子写入
    fn begin(&self, name: &str) -> Result<Box<dyn StagedFile>>;

    /// 查询文件是否存在
    fn exists(&self, name: &str) -> bool;

    /// 查询文件创建时间，不存在时返回None（不缓存，每次实时查询）
    fn created_at(&self, name: &str) -> Result<Option<SystemTime>>;
}

/// 文件系统存储
///
/// 暂存文件创建在与最终位置相同的目录下，保证改名是同一文件系统内的
/// 原子操作。
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// 创建文件系统存储
    ///
    /// # 参数
    /// * `root` - 输出文件的根目录，不存在时在首次写入前创建
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Storage for FsStorage {
    fn begin(&self, name: &str) -> Result<Box<dyn StagedFile>> {
        fs::create_dir_all(&self.root)?;
        let temp = NamedTempFile::new_in(&self.root)?;
        Ok(Box::new(FsStagedFile {
            temp,
            target: self.target_path(name),
        }))
    }

    fn exists(&self, name: &str) -> bool {
        self.target_path(name).is_file()
    }

    fn created_at(&self, name: &str) -> Result<Option<SystemTime>> {
        match fs::metadata(self.target_path(name)) {
            Ok(meta) => {
                // 部分文件系统不记录创建时间，回退到修改时间
                let timestamp = meta.created().or_else(|_| meta.modified())?;
                Ok(Some(timestamp))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

struct FsStagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl Write for FsStagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.as_file_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.as_file_mut().flush()
    }
}

impl Seek for FsStagedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.temp.as_file_mut().seek(pos)
    }
}

impl StagedFile for FsStagedFile {
    fn commit(self: Box<Self>) -> Result<()> {
        self.temp
            .persist(&self.target)
            .map_err(|e| ExportError::StorageFailure(format!("改名到最终位置失败: {}", e)))?;
        Ok(())
    }

    fn discard(self: Box<Self>) {
        // NamedTempFile析构时删除暂存文件
    }
}

/// 内存存储
///
/// 与文件系统存储语义相同的内存实现，用于测试导出流程。
/// 克隆后的实例共享同一份文件表。
#[derive(Clone, Default)]
pub struct MemStorage {
    files: Arc<Mutex<HashMap<String, MemFile>>>,
}

struct MemFile {
    bytes: Vec<u8>,
    created_at: SystemTime,
}

impl MemStorage {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取已提交文件的内容
    pub fn bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(name).map(|file| file.bytes.clone()))
    }
}

impl Storage for MemStorage {
    fn begin(&self, name: &str) -> Result<Box<dyn StagedFile>> {
        Ok(Box::new(MemStagedFile {
            name: name.to_string(),
            buffer: Cursor::new(Vec::new()),
            files: Arc::clone(&self.files),
        }))
    }

    fn exists(&self, name: &str) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(name))
            .unwrap_or(false)
    }

    fn created_at(&self, name: &str) -> Result<Option<SystemTime>> {
        Ok(self
            .files
            .lock()
            .ok()
            .and_then(|files| files.get(name).map(|file| file.created_at)))
    }
}

struct MemStagedFile {
    name: String,
    buffer: Cursor<Vec<u8>>,
    files: Arc<Mutex<HashMap<String, MemFile>>>,
}

impl Write for MemStagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush()
    }
}

impl Seek for MemStagedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl StagedFile for MemStagedFile {
    fn commit(self: Box<Self>) -> Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ExportError::StorageFailure("文件表锁被污染".to_string()))?;
        files.insert(
            self.name,
            MemFile {
                bytes: self.buffer.into_inner(),
                created_at: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn discard(self: Box<Self>) {}
}
