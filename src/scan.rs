//! Input discovery: loose class files, directory trees and jars.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use zip::ZipArchive;

/// One class file to decompile.
#[derive(Debug, Clone)]
pub struct ClassInput {
    /// File name relative to its root (`org/example/A.class`); the output
    /// path is derived from it.
    pub name: String,
    /// Where the bytes came from, for messages.
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// Descriptor-only classes that have no source declaration of their own.
const SKIPPED: [&str; 2] = ["module-info.class", "package-info.class"];

pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<ClassInput>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in scan_dir(path)? {
                if is_jar(&file) {
                    inputs.extend(read_jar(&file)?);
                } else {
                    let name = file
                        .strip_prefix(path)
                        .unwrap_or(&file)
                        .to_string_lossy()
                        .replace('\\', "/");
                    inputs.push(read_file(&file, name)?);
                }
            }
        } else if is_jar(path) {
            inputs.extend(read_jar(path)?);
        } else {
            // Named explicitly, so a wrong suffix is reported later instead of skipped.
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            inputs.push(read_file(path, name)?);
        }
    }
    inputs.retain(|input| {
        let keep = !SKIPPED.iter().any(|s| input.name.rsplit('/').next() == Some(*s));
        if !keep {
            tracing::debug!(name = %input.name, origin = %input.origin, "skipping descriptor-only class");
        }
        keep
    });
    Ok(inputs)
}

fn is_jar(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "jar")
}

/// `.class` and `.jar` files under `base`, sorted.
pub fn scan_dir(base: &Path) -> Result<Vec<PathBuf>> {
    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(base)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build_parallel();

    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            if let Ok(entry) = entry {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|e| e == "class" || e == "jar") {
                    let _ = tx.send(path.to_path_buf());
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<PathBuf> = rx.iter().collect();
    files.sort();
    Ok(files)
}

fn read_file(path: &Path, name: String) -> Result<ClassInput> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read class file: {}", path.display()))?;
    Ok(ClassInput {
        name,
        origin: path.display().to_string(),
        bytes,
    })
}

fn read_jar(jar_path: &Path) -> Result<Vec<ClassInput>> {
    let file = File::open(jar_path).with_context(|| format!("Failed to open jar: {}", jar_path.display()))?;
    // SAFETY: The file is opened read-only and outlives the mapping.
    let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to mmap jar: {}", jar_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip structure: {}", jar_path.display()))?;

    let mut inputs = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || !entry.name().ends_with(".class") {
            continue;
        }
        // Entries naming `..` or an absolute path would land outside the output directory.
        let Some(name) = entry.enclosed_name().map(|p| p.to_string_lossy().replace('\\', "/")) else {
            tracing::warn!(entry = %entry.name(), jar = %jar_path.display(), "skipping entry with unsafe path");
            continue;
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read {name} from {}", jar_path.display()))?;
        inputs.push(ClassInput {
            origin: format!("{}!/{name}", jar_path.display()),
            name,
            bytes,
        });
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use zip::write::FileOptions;

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn walks_directories_relative_to_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("org/example"))?;
        fs::write(dir.path().join("org/example/A.class"), b"a")?;
        fs::write(dir.path().join("org/example/notes.txt"), b"x")?;

        let inputs = collect_inputs(&[dir.path().to_path_buf()])?;
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "org/example/A.class");
        assert_eq!(inputs[0].bytes, b"a");
        Ok(())
    }

    #[test]
    fn reads_jar_entries_and_skips_descriptor_only_classes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let jar = dir.path().join("lib.jar");
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
                ("org/example/A.class", b"a"),
                ("org/example/A$Inner.class", b"b"),
                ("org/example/package-info.class", b"p"),
                ("module-info.class", b"m"),
            ],
        )?;

        let inputs = collect_inputs(&[jar.clone()])?;
        let names: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["org/example/A.class", "org/example/A$Inner.class"]);
        assert!(inputs[0].origin.ends_with("lib.jar!/org/example/A.class"));
        Ok(())
    }

    #[test]
    fn explicit_file_keeps_its_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Stray.bin");
        fs::write(&path, b"x")?;
        let inputs = collect_inputs(&[path])?;
        assert_eq!(inputs[0].name, "Stray.bin");
        Ok(())
    }

    #[test]
    fn jar_entries_escaping_the_root_are_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let jar = dir.path().join("evil.jar");
        write_jar(
            &jar,
            &[
                ("../escaped/Point.class", b"x"),
                ("/abs/Point.class", b"y"),
                ("org/example/Ok.class", b"z"),
            ],
        )?;

        let inputs = collect_inputs(&[jar])?;
        let names: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["org/example/Ok.class"]);
        Ok(())
    }
}
