use std::fs;

use pretty_assertions::assert_eq;

use super::*;
use crate::PlugOptions;

fn entry(locator: &str) -> PluginEntry {
	PluginEntry::new(locator, PlugOptions::default()).expect("valid locator")
}

fn install(root: &Path, name: &str, manifest: Option<&str>) -> PathBuf {
	let dir = root.join(name);
	fs::create_dir_all(&dir).unwrap();
	if let Some(text) = manifest {
		fs::write(dir.join(MANIFEST_FILE), text).unwrap();
	}
	dir
}

#[test]
fn reads_manifest_and_colors() {
	let tmp = tempfile::tempdir().unwrap();
	let dir = install(tmp.path(), "nerdtree", Some("commands = [\"NERDTree\", \"NERDTreeToggle\"]\n\n[filetypes]\n\"*.nerd\" = \"nerdtree\"\n"));
	fs::create_dir_all(dir.join("colors")).unwrap();
	fs::write(dir.join("colors/forest.vim"), "").unwrap();
	fs::write(dir.join("colors/README"), "").unwrap();

	let resolved = DirResolver::new(tmp.path()).resolve(&entry("preservim/nerdtree")).unwrap();
	assert_eq!(resolved.name, "nerdtree");
	assert_eq!(resolved.info.commands, vec!["NERDTree", "NERDTreeToggle"]);
	assert_eq!(resolved.info.colorschemes, vec!["forest"]);
	assert_eq!(resolved.info.filetypes.get("*.nerd").map(String::as_str), Some("nerdtree"));
}

#[test]
fn missing_manifest_is_empty() {
	let tmp = tempfile::tempdir().unwrap();
	install(tmp.path(), "vim-surround", None);

	let resolved = DirResolver::new(tmp.path()).resolve(&entry("tpope/vim-surround")).unwrap();
	assert_eq!(resolved.info, PluginInfo::default());
}

#[test]
fn not_installed() {
	let tmp = tempfile::tempdir().unwrap();
	let err = DirResolver::new(tmp.path()).resolve(&entry("tpope/vim-fugitive")).unwrap_err();
	assert!(matches!(err, PluginError::NotInstalled { ref name, .. } if name == "vim-fugitive"));
}

#[test]
fn malformed_manifest() {
	let tmp = tempfile::tempdir().unwrap();
	install(tmp.path(), "broken", Some("commands = \"not a list\""));
	install(tmp.path(), "typo", Some("comands = []"));

	let resolver = DirResolver::new(tmp.path());
	assert!(matches!(resolver.resolve(&entry("x/broken")), Err(PluginError::Manifest { .. })));
	assert!(matches!(resolver.resolve(&entry("x/typo")), Err(PluginError::Manifest { .. })));
}

#[test]
fn rtp_and_local_paths() {
	let tmp = tempfile::tempdir().unwrap();
	let base = install(tmp.path(), "fzf", None);
	fs::create_dir_all(base.join("vim")).unwrap();
	fs::write(base.join("vim").join(MANIFEST_FILE), "commands = [\"FZF\"]").unwrap();

	let fzf = PluginEntry::new("junegunn/fzf", PlugOptions {
		rtp: Some("vim".into()),
		..PlugOptions::default()
	})
	.unwrap();
	let resolver = DirResolver::new(tmp.path());
	assert_eq!(resolver.resolve(&fzf).unwrap().info.commands, vec!["FZF"]);

	let elsewhere = tempfile::tempdir().unwrap();
	let local = install(elsewhere.path(), "mine", Some("mappings = [\"mine-go\"]"));
	let resolved = resolver.resolve(&entry(local.to_str().unwrap())).unwrap();
	assert_eq!(resolved.info.mappings, vec!["mine-go"]);
}

#[test]
fn one_failure_does_not_block_the_rest() {
	let tmp = tempfile::tempdir().unwrap();
	install(tmp.path(), "a", Some("commands = [\"A\"]"));
	install(tmp.path(), "c", Some("commands = [\"C\"]"));

	let mut manifest = Manifest::new();
	for locator in ["x/a", "x/b", "x/c"] {
		manifest.push(entry(locator));
	}

	let report = resolve_manifest(&manifest, &DirResolver::new(tmp.path()));
	let loaded: Vec<_> = report.loaded.iter().map(|(_, p)| p.name.as_str()).collect();
	assert_eq!(loaded, vec!["a", "c"]);
	assert!(report.is_loaded("c"));
	assert!(matches!(report.failure("b"), Some(PluginError::NotInstalled { .. })));
}

#[test]
fn closure_resolver() {
	let mut manifest = Manifest::new();
	manifest.push(entry("morhetz/gruvbox"));

	let resolver = |e: &PluginEntry| {
		Ok::<_, PluginError>(ResolvedPlugin {
			name: e.name(),
			path: PathBuf::from("/virtual"),
			info: PluginInfo {
				colorschemes: vec!["gruvbox".into()],
				..PluginInfo::default()
			},
		})
	};
	let report = resolve_manifest(&manifest, &resolver);
	assert_eq!(report.loaded[0].1.info.colorschemes, vec!["gruvbox"]);
}
