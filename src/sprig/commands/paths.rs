use crate::commands::{CmdResult, NamedPath, SprigPaths};
use crate::config::CONFIG_FILENAME;
use crate::error::Result;

pub fn run(paths: &SprigPaths) -> Result<CmdResult> {
    let entries = [
        ("home", paths.home.clone()),
        ("data", paths.data_file.clone()),
        ("images", paths.images_dir()),
        ("config", paths.config_dir.join(CONFIG_FILENAME)),
    ];
    Ok(CmdResult::default().with_paths(
        entries
            .into_iter()
            .map(|(name, path)| NamedPath {
                name: name.to_string(),
                path,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn lists_every_location() {
        let result = run(&SprigPaths::from_home("/srv/sprig")).unwrap();
        let names: Vec<_> = result.paths.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["home", "data", "images", "config"]);
        assert_eq!(
            result.paths[3].path,
            PathBuf::from("/srv/sprig/config.json")
        );
    }
}
