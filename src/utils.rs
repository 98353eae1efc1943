use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Returns the cross-platform directory for application data
pub fn get_app_data_dir() -> PathBuf {
    if cfg!(target_os = "macos") {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut path = PathBuf::from(home_dir);
        path.push("Library");
        path.push("Application Support");
        path.push("QuakeMap");
        path
    } else if cfg!(target_os = "windows") {
        // %APPDATA%/QuakeMap, or the current directory when unset
        match env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join("QuakeMap"),
            Err(_) => PathBuf::from(".").join("QuakeMap"),
        }
    } else if let Ok(xdg_data_home) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data_home).join("QuakeMap")
    } else {
        // ~/.local/share/QuakeMap
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut path = PathBuf::from(home_dir);
        path.push(".local");
        path.push("share");
        path.push("QuakeMap");
        path
    }
}

/// Ensures the directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Returns the path to the application configuration file
pub fn get_config_path() -> PathBuf {
    get_app_data_dir().join("quakemap.ini")
}

/// Opens the specified URL in the default browser using native commands
pub fn open_browser(url: &str) -> Result<(), std::io::Error> {
    let os = env::consts::OS;
    match os {
        "macos" => {
            Command::new("open").arg(url).spawn()?;
        }
        "windows" => {
            Command::new("cmd").args(["/C", "start", url]).spawn()?;
        }
        "linux" => {
            Command::new("xdg-open").arg(url).spawn()?;
        }
        _ => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("Unsupported OS: {}", os),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_lives_in_app_dir() {
        let path = get_config_path();
        assert_eq!(path.file_name().unwrap(), "quakemap.ini");
        assert!(path.starts_with(get_app_data_dir()));
    }

    #[test]
    fn test_ensure_directory_exists_is_idempotent() {
        let dir = env::temp_dir().join(format!("quakemap-utils-{}", std::process::id()));
        ensure_directory_exists(&dir.join("nested")).unwrap();
        ensure_directory_exists(&dir.join("nested")).unwrap();
        assert!(dir.join("nested").is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
