/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;

use omstream::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates nested directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("static").join("audio");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that only matching files directly inside the directory are listed
#[test]
fn test_list_files_with_extension_shouldBeSortedAndShallow() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "puranic_vishnu_Matsya.mp3", "")?;
    common::create_test_file(dir, "general_Agni.MP3", "")?;
    common::create_test_file(dir, "notes.txt", "")?;
    common::create_test_file(dir, "nested/inferior_Soma.mp3", "")?;
    common::create_test_file(dir, ".partial_x1y2.mp3", "ID3")?;

    let files = FileManager::list_files_with_extension(dir, ".mp3")?;

    assert_eq!(files, vec!["general_Agni.MP3", "puranic_vishnu_Matsya.mp3"]);
    Ok(())
}

/// Test that a missing directory lists nothing
#[test]
fn test_list_files_with_extension_withMissingDir_shouldBeEmpty() -> Result<()> {
    let files = FileManager::list_files_with_extension("./no_such_audio_dir_12345", "mp3")?;
    assert!(files.is_empty());
    Ok(())
}

/// Test that write_atomic replaces content and creates parents
#[test]
fn test_write_atomic_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("backend").join("audio_map.json");

    FileManager::write_atomic(&path, "{}")?;
    FileManager::write_atomic(&path, "{ \"Umā\": {} }")?;

    assert_eq!(fs::read_to_string(&path)?, "{ \"Umā\": {} }");
    assert_eq!(fs::read_dir(path.parent().unwrap())?.count(), 1);
    Ok(())
}

/// Test copy and removal helpers
#[test]
fn test_copy_file_and_remove_if_exists() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "speech.mp3", "ID3")?;
    let target = temp_dir.path().join("audio").join("episode.mp3");

    FileManager::copy_file(&source, &target)?;
    assert_eq!(FileManager::read_to_string(&target)?, "ID3");

    FileManager::remove_if_exists(&source)?;
    FileManager::remove_if_exists(&source)?;
    assert!(!source.exists());

    assert!(FileManager::copy_file(&source, &target).is_err());
    Ok(())
}
