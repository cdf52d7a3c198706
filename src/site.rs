//! Site generation: pages from a content tree, plus a verbatim copy of static
//! assets.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::{self, RenderOptions};

pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// Fill `template` with the title and rendered body of `markdown`.
pub fn render_page(markdown: &str, template: &str, options: &RenderOptions) -> Result<String> {
    let title = parser::extract_title(markdown)?;
    let content = parser::document_to_tree(markdown, options)?.to_html();

    Ok(template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(CONTENT_PLACEHOLDER, &content))
}

/// A site rooted at a directory. Every path it reads or writes must resolve
/// inside that root.
pub struct Site {
    root: PathBuf,
    config: Config,
}

impl Site {
    /// A relative `root` is taken against the current directory.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root: normalize(&root),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            italic: self.config.markdown.italic_delimiter,
        }
    }

    /// Copy static assets, then render every page. Returns the number of
    /// pages written.
    pub fn build(&self) -> Result<usize> {
        let site = &self.config.site;
        self.copy_static()?;
        self.generate_pages_recursive(&site.content_dir, &site.template, &site.public_dir)
    }

    /// Replace the output tree with a fresh copy of the static tree.
    pub fn copy_static(&self) -> Result<()> {
        let source = self.resolve(&self.config.site.static_dir)?;
        let target = self.resolve(&self.config.site.public_dir)?;
        self.check_output(&target)?;

        if target.exists() {
            debug!("Removing {}", target.display());
            fs::remove_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        }

        info!("Copying {} to {}", source.display(), target.display());
        copy_dir(&source, &target)
    }

    pub fn generate_page(&self, from: &Path, template: &Path, dest: &Path) -> Result<()> {
        let template_path = self.resolve(template)?;
        let template = read(&template_path)?;
        self.write_page(&self.resolve(from)?, &template, &self.resolve(dest)?)
    }

    /// Render every `.md` file under `content_dir` into the mirrored location
    /// under `dest_dir`. Returns the number of pages written.
    pub fn generate_pages_recursive(
        &self,
        content_dir: &Path,
        template: &Path,
        dest_dir: &Path,
    ) -> Result<usize> {
        let template_path = self.resolve(template)?;
        let template = read(&template_path)?;
        self.generate_dir(
            &self.resolve(content_dir)?,
            &template,
            &self.resolve(dest_dir)?,
        )
    }

    fn generate_dir(&self, content_dir: &Path, template: &str, dest_dir: &Path) -> Result<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| Error::io(dest_dir, e))?;

        let mut pages = 0;
        for path in sorted_entries(content_dir)? {
            let Some(name) = path.file_name() else {
                continue;
            };
            let dest = dest_dir.join(name);

            if path.is_dir() {
                pages += self.generate_dir(&path, template, &dest)?;
            } else if path.extension().is_some_and(|ext| ext == "md") {
                self.write_page(&path, template, &dest.with_extension("html"))?;
                pages += 1;
            } else {
                debug!("Skipping {}", path.display());
            }
        }
        Ok(pages)
    }

    fn write_page(&self, from: &Path, template: &str, dest: &Path) -> Result<()> {
        info!("Generating page from {} to {}", from.display(), dest.display());

        let markdown = read(from)?;
        let html = render_page(&markdown, template, &self.options())?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(dest, html).map_err(|e| Error::io(dest, e))
    }

    /// The output tree is deleted on every build, so it must not hold the
    /// root or any input.
    fn check_output(&self, target: &Path) -> Result<()> {
        if target == self.root {
            return Err(Error::OutputOverlap {
                output: target.to_path_buf(),
                input: self.root.clone(),
            });
        }

        let site = &self.config.site;
        for input in [&site.content_dir, &site.static_dir, &site.template] {
            let input = self.resolve(input)?;
            if input.starts_with(target) {
                return Err(Error::OutputOverlap {
                    output: target.to_path_buf(),
                    input,
                });
            }
        }
        Ok(())
    }

    /// Resolve `path` against the root and reject anything that escapes it.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let resolved = normalize(&self.root.join(path));
        if !resolved.starts_with(&self.root) {
            return Err(Error::OutsideWorkspace { path: resolved });
        }
        Ok(resolved)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    paths.sort();
    Ok(paths)
}

fn copy_dir(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| Error::io(target, e))?;

    for path in sorted_entries(source)? {
        let Some(name) = path.file_name() else {
            continue;
        };
        let dest = target.join(name);

        if path.is_dir() {
            copy_dir(&path, &dest)?;
        } else {
            debug!("Copying {} to {}", path.display(), dest.display());
            fs::copy(&path, &dest).map_err(|e| Error::io(&path, e))?;
        }
    }
    Ok(())
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the filesystem root is the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_both_placeholders() {
        let html = render_page(
            "# Hi\n\nSome **bold** text.",
            "<title>{{ Title }}</title><body>{{ Content }}</body>",
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(
            html,
            "<title>Hi</title><body><div><h1>Hi</h1><p>Some <b>bold</b> text.</p></div></body>"
        );
    }

    #[test]
    fn page_without_title_fails() {
        let err = render_page("## Sub", "{{ Title }}", &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NoTitle));
    }

    #[test]
    fn normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/b/..")), PathBuf::from("a"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn normalize_keeps_leading_parent_dirs() {
        assert_eq!(normalize(Path::new("../site")), PathBuf::from("../site"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize(Path::new("../../x/..")), PathBuf::from("../.."));
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let site = Site::new("../site", Config::default());

        assert!(site.root().is_absolute());
        assert_eq!(site.root(), cwd.parent().unwrap().join("site"));
    }

    #[test]
    fn output_may_not_hold_root_or_inputs() {
        let overlaps = |public_dir: &str, static_dir: &str| {
            let mut config = Config::default();
            config.site.public_dir = public_dir.into();
            config.site.static_dir = static_dir.into();
            let site = Site::new("/srv/site", config);
            let target = site.resolve(Path::new(public_dir)).unwrap();
            site.check_output(&target)
        };

        assert!(overlaps("public", "static").is_ok());
        assert!(overlaps("public", "staticfiles").is_ok());
        assert!(matches!(
            overlaps(".", "static"),
            Err(Error::OutputOverlap { input, .. }) if input == Path::new("/srv/site")
        ));
        assert!(matches!(
            overlaps("content", "static"),
            Err(Error::OutputOverlap { input, .. }) if input == Path::new("/srv/site/content")
        ));
        assert!(matches!(
            overlaps("public", "public/assets"),
            Err(Error::OutputOverlap { input, .. }) if input == Path::new("/srv/site/public/assets")
        ));
    }

    #[test]
    fn paths_outside_root_are_rejected() {
        let site = Site::new("/srv/site", Config::default());

        assert_eq!(
            site.resolve(Path::new("content/blog")).unwrap(),
            PathBuf::from("/srv/site/content/blog")
        );
        assert!(matches!(
            site.resolve(Path::new("../elsewhere")),
            Err(Error::OutsideWorkspace { .. })
        ));
        assert!(matches!(
            site.resolve(Path::new("/tmp/public")),
            Err(Error::OutsideWorkspace { .. })
        ));
    }
}
