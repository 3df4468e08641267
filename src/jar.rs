//! Simple file-backed cookie jar for sessions that should survive restarts.
//!
//! The file holds the JSON encoding produced by `cookie_store`. Only persistent, unexpired
//! cookies are written; session cookies live as long as the process does.

// std
use std::{
	fs::{self, File},
	io::{BufReader, Write},
	path::Path,
};
// crates.io
use cookie_store::CookieStore;
// self
use crate::{_prelude::*, error::CookieJarError};

/// Durable location of a session's cookies.
#[derive(Clone, Debug)]
pub struct CookieFile {
	path: PathBuf,
	write_guard: Arc<Mutex<()>>,
}
impl CookieFile {
	/// Points at `path`; nothing is read or created until [`load`](Self::load) or
	/// [`persist`](Self::persist).
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), write_guard: Default::default() }
	}

	/// Location of the jar on disk.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Loads the jar, returning an empty store when the file is missing or empty.
	pub fn load(&self) -> Result<CookieStore, CookieJarError> {
		if !self.path.exists() {
			return Ok(CookieStore::default());
		}

		let metadata = self.path.metadata().map_err(|e| CookieJarError::Backend {
			message: format!("Failed to inspect {}: {e}", self.path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(CookieStore::default());
		}

		let file = File::open(&self.path).map_err(|e| CookieJarError::Backend {
			message: format!("Failed to read {}: {e}", self.path.display()),
		})?;

		cookie_store::serde::json::load(BufReader::new(file)).map_err(|e| {
			CookieJarError::Serialization {
				message: format!("Failed to parse {}: {e}", self.path.display()),
			}
		})
	}

	/// Encodes the persistent, unexpired cookies of `store`.
	pub fn encode(store: &CookieStore) -> Result<Vec<u8>, CookieJarError> {
		let mut buf = Vec::new();

		cookie_store::serde::json::save(store, &mut buf).map_err(|e| {
			CookieJarError::Serialization { message: format!("Failed to serialize cookie jar: {e}") }
		})?;

		Ok(buf)
	}

	/// Encodes and writes `store` in one step.
	pub fn save(&self, store: &CookieStore) -> Result<(), CookieJarError> {
		self.persist(&Self::encode(store)?)
	}

	/// Atomically replaces the jar with an encoded snapshot.
	///
	/// Concurrent writers sharing this handle are serialized; the snapshot goes to a `.tmp`
	/// sibling first and is renamed over the jar once synced.
	pub fn persist(&self, snapshot: &[u8]) -> Result<(), CookieJarError> {
		let _guard = self.write_guard.lock();

		self.ensure_parent_exists()?;

		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CookieJarError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(snapshot).map_err(|e| CookieJarError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CookieJarError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| CookieJarError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn ensure_parent_exists(&self) -> Result<(), CookieJarError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| CookieJarError::Backend {
				message: format!("Failed to create cookie directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{
		env, process,
		time::{SystemTime, UNIX_EPOCH},
	};
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System clock should be after the Unix epoch.")
			.as_nanos();

		env::temp_dir().join(format!("pennkey_weblogin_jar_{}_{nanos}.json", process::id()))
	}

	fn sso_url() -> Url {
		Url::parse("https://weblogin.pennkey.upenn.edu/idp/profile/SAML2/Redirect/SSO")
			.expect("Failed to parse cookie fixture URL.")
	}

	#[test]
	fn missing_and_empty_files_load_as_empty_jars() {
		let path = temp_path();
		let file = CookieFile::new(&path);

		assert_eq!(file.load().expect("Missing jar should load.").iter_any().count(), 0);

		fs::write(&path, b"").expect("Failed to create empty jar fixture.");

		assert_eq!(file.load().expect("Empty jar should load.").iter_any().count(), 0);

		fs::remove_file(&path).expect("Failed to remove empty jar fixture.");
	}

	#[test]
	fn save_keeps_persistent_cookies_only() {
		let path = temp_path();
		let file = CookieFile::new(&path);
		let mut store = CookieStore::default();

		store
			.parse("shib_idp_session=abc; Max-Age=3600; Path=/", &sso_url())
			.expect("Failed to insert persistent cookie.");
		store.parse("JSESSIONID=xyz; Path=/", &sso_url()).expect("Failed to insert session cookie.");
		file.save(&store).expect("Failed to save cookie jar.");

		let reloaded = file.load().expect("Failed to reload cookie jar.");

		assert!(reloaded.get("weblogin.pennkey.upenn.edu", "/", "shib_idp_session").is_some());
		assert!(reloaded.get("weblogin.pennkey.upenn.edu", "/", "JSESSIONID").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary cookie jar {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_jar_reports_serialization_error() {
		let path = temp_path();

		fs::write(&path, b"{not json").expect("Failed to create corrupt jar fixture.");

		let err = CookieFile::new(&path).load().expect_err("Corrupt jar should not load.");

		assert!(matches!(err, CookieJarError::Serialization { .. }));

		fs::remove_file(&path).expect("Failed to remove corrupt jar fixture.");
	}
}
