// Copyright 2025 Pavel Roskin
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Search for the termcap database file

use std::{env, path::PathBuf};

const TERMCAP_FILES: &[&str] = &[
    "/etc/termcap",
    "/usr/share/misc/termcap",
    "/usr/share/termcap",
];

/// Errors reported when looking for a termcap file
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// None of the candidate files exists
    #[error("File not found")]
    FileNotFound,
}

/// Returns all files that are searched for the termcap database, in order
///
/// This function does not attempt to verify if the files actually exist.
pub fn search_files() -> Vec<PathBuf> {
    let mut search_files = vec![];

    // Lazily evaluated iterator, consumed at most once.
    let mut default_files = TERMCAP_FILES.iter().map(PathBuf::from);

    // `TERMCAP` may hold an entry instead of a file name, only absolute paths count.
    if let Some(file) = env::var_os("TERMCAP").map(PathBuf::from)
        && file.is_absolute()
    {
        search_files.push(file);
    }

    // Files separated by colons or spaces, an empty element stands for the defaults.
    if let Ok(files) = env::var("TERMPATH") {
        for file in files.split([':', ' ']) {
            if file.is_empty() {
                search_files.extend(&mut default_files);
            } else {
                search_files.push(PathBuf::from(file));
            }
        }
    }

    if let Some(home_dir) = env::home_dir() {
        search_files.push(home_dir.join(".termcap"));
    }

    // Nothing is added if the defaults were used already.
    search_files.extend(&mut default_files);

    search_files
}

/// Find the termcap database file
///
/// Returns the first existing file from [`search_files`].
pub fn locate() -> Result<PathBuf, Error> {
    let found = search_files().into_iter().find(|file| file.is_file());
    if let Some(file) = &found {
        log::debug!("termcap: using {}", file.display());
    }
    found.ok_or(Error::FileNotFound)
}

#[cfg(test)]
mod test {
    use std::fs::File;

    use tempfile::tempdir;

    use super::*;

    fn paths(files: &[&str]) -> Vec<PathBuf> {
        files.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn search_order() {
        temp_env::with_vars(
            [
                ("TERMCAP", Some("/my/termcap")),
                ("TERMPATH", Some("/my/termcap1 /my/termcap2")),
                ("HOME", Some("/home/user")),
            ],
            || {
                assert_eq!(
                    search_files(),
                    paths(&[
                        "/my/termcap",
                        "/my/termcap1",
                        "/my/termcap2",
                        "/home/user/.termcap",
                        "/etc/termcap",
                        "/usr/share/misc/termcap",
                        "/usr/share/termcap",
                    ])
                );
            },
        );
    }

    #[test]
    fn search_order_with_empty_element() {
        temp_env::with_vars(
            [
                ("TERMCAP", None),
                ("TERMPATH", Some("/my/termcap1::/my/termcap2")),
                ("HOME", Some("/home/user")),
            ],
            || {
                assert_eq!(
                    search_files(),
                    paths(&[
                        "/my/termcap1",
                        "/etc/termcap",
                        "/usr/share/misc/termcap",
                        "/usr/share/termcap",
                        "/my/termcap2",
                        "/home/user/.termcap",
                    ])
                );
            },
        );
    }

    #[test]
    fn inline_entry_in_termcap_variable() {
        temp_env::with_vars(
            [
                ("TERMCAP", Some("vt100:co#80:li#24:")),
                ("TERMPATH", None),
                ("HOME", Some("/home/user")),
            ],
            || {
                assert_eq!(search_files()[0], PathBuf::from("/home/user/.termcap"));
            },
        );
    }

    #[test]
    fn found_in_termpath() {
        let temp_dir = tempdir().unwrap();
        let termcap_file = temp_dir.path().join("termcap");
        File::create(&termcap_file).unwrap();
        let termpath = format!("/no/such/termcap {}", termcap_file.display());

        temp_env::with_vars(
            [("TERMCAP", None), ("TERMPATH", Some(termpath))],
            || {
                assert_eq!(locate(), Ok(termcap_file));
            },
        );
    }

    #[test]
    fn found_in_termcap_variable() {
        let temp_dir = tempdir().unwrap();
        let termcap_file = temp_dir.path().join("my.termcap");
        File::create(&termcap_file).unwrap();

        temp_env::with_vars(
            [("TERMCAP", Some(&termcap_file)), ("TERMPATH", None)],
            || {
                assert_eq!(locate(), Ok(termcap_file.clone()));
            },
        );
    }

    #[test]
    fn dot_termcap_in_home() {
        let temp_dir = tempdir().unwrap();
        let temp_dir = temp_dir.path();
        let termcap_file = temp_dir.join(".termcap");
        File::create(&termcap_file).unwrap();

        temp_env::with_vars(
            [
                ("TERMCAP", None),
                ("TERMPATH", None),
                ("HOME", Some(temp_dir)),
            ],
            || {
                assert_eq!(locate(), Ok(termcap_file));
            },
        );
    }

    #[test]
    fn directories_are_skipped() {
        let temp_dir = tempdir().unwrap();
        let temp_dir = temp_dir.path();

        temp_env::with_vars(
            [
                ("TERMCAP", Some(temp_dir)),
                ("TERMPATH", None),
                ("HOME", Some(temp_dir)),
            ],
            || {
                if let Ok(file) = locate() {
                    assert_ne!(file, temp_dir);
                    assert!(file.is_file());
                }
            },
        );
    }
}
