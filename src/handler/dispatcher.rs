//! Request dispatch module
//!
//! Routes first, files second: a path that no route claims falls through to
//! the file server when a docroot is configured.

use super::file_server::FileServer;
use crate::error::DispatchError;
use crate::logger;
use crate::response::Response;
use crate::site::ServerConfig;
use std::borrow::Cow;

/// Shared, read-mostly front of a configured site
#[derive(Debug)]
pub struct Dispatcher {
    config: ServerConfig,
}

impl Dispatcher {
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Answer `path`.
    ///
    /// A matching route's handler result is returned as is, errors included.
    /// Without a match the file server answers; without a docroot the result
    /// is `NotFound`.
    pub fn dispatch(&self, path: &str) -> Result<Response, DispatchError> {
        if let Some(found) = self.config.routes().find(path) {
            logger::log_route_matched(path, found.route.pattern());
            return found.invoke().map_err(DispatchError::Handler);
        }

        let Some(files) = FileServer::new(&self.config) else {
            return Err(DispatchError::not_found(path));
        };
        logger::log_fallback(path);
        files.handle_with(path, |virtual_path| self.resolve_virtual(virtual_path))
    }

    /// Text produced by the route bound to `path`, without any file fallback
    pub fn resolve_virtual(&self, path: &str) -> Option<String> {
        let found = self.config.routes().find(path)?;
        match found.invoke() {
            Ok(resp) => resp.as_text().map(Cow::into_owned),
            Err(e) => {
                logger::log_warning(&format!("Handler for virtual path {path} failed: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::fs::{EntryKind, Filesystem, MemoryFs};
    use crate::routing::{HandlerResult, Params};
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn woome_fs() -> MemoryFs {
        MemoryFs::new()
            .with_file("home/woome/ci/test_results/index.html", "the index")
            .with_file("home/woome/ci/test_results/20100730/file.txt", "result 1")
    }

    fn file_site() -> Dispatcher {
        let mut config = ServerConfig::with_filesystem(Arc::new(woome_fs()));
        config.set_docroot("/home/woome/ci").unwrap();
        Dispatcher::new(config)
    }

    fn text(resp: &Response) -> String {
        resp.as_text().unwrap().into_owned()
    }

    #[test]
    fn test_url_dispatch() {
        let mut config = ServerConfig::new();
        config
            .register("/one/$", |_: &Params| -> HandlerResult { Ok(Response::html("OK")) })
            .unwrap();
        config
            .register("/two/(?P<name>[A-Za-z]+)/$", |params: &Params| -> HandlerResult {
                Ok(Response::html(params.get("name").unwrap_or("?")))
            })
            .unwrap();
        let dispatcher = Dispatcher::new(config);

        assert_eq!(text(&dispatcher.dispatch("/one").unwrap()), "OK");
        assert_eq!(text(&dispatcher.dispatch("/one/").unwrap()), "OK");
        assert_eq!(text(&dispatcher.dispatch("/two/Nic").unwrap()), "Nic");
        assert_eq!(text(&dispatcher.dispatch("/two/Nic/").unwrap()), "Nic");
    }

    #[test]
    fn test_handler_receives_exactly_named_captures() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        let mut config = ServerConfig::new();
        config
            .register(
                "/user/(?P<username>[a-z]+)/(\\d+)/$",
                move |params: &Params| -> HandlerResult {
                    let pairs: Vec<(String, String)> = params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    record.lock().unwrap().push(pairs);
                    Ok(Response::html("ok"))
                },
            )
            .unwrap();
        let dispatcher = Dispatcher::new(config);

        dispatcher.dispatch("/user/nic/7").unwrap();
        dispatcher.dispatch("/user/nic/7/").unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for call in seen.iter() {
            assert_eq!(call, &vec![("username".to_string(), "nic".to_string())]);
        }
    }

    #[test]
    fn test_no_route_and_no_docroot_is_not_found() {
        let dispatcher = Dispatcher::new(ServerConfig::new());
        assert!(dispatcher.dispatch("/anything").unwrap_err().is_not_found());
    }

    #[test]
    fn test_handler_error_propagates_unchanged() {
        let mut config = ServerConfig::with_filesystem(Arc::new(woome_fs()));
        config.set_docroot("/home/woome/ci").unwrap();
        config
            .register("/test_results/$", |_: &Params| -> HandlerResult {
                Err(BoxError::from("database unavailable"))
            })
            .unwrap();
        let dispatcher = Dispatcher::new(config);

        match dispatcher.dispatch("/test_results/") {
            Err(DispatchError::Handler(source)) => {
                assert_eq!(source.to_string(), "database unavailable");
            }
            other => panic!("expected handler error, got {other:?}"),
        }
    }

    #[test]
    fn test_route_shadows_file() {
        let mut config = ServerConfig::with_filesystem(Arc::new(woome_fs()));
        config.set_docroot("/home/woome/ci").unwrap();
        config
            .register("/test_results/$", |_: &Params| -> HandlerResult {
                Ok(Response::html("from route"))
            })
            .unwrap();
        let dispatcher = Dispatcher::new(config);

        assert_eq!(text(&dispatcher.dispatch("/test_results").unwrap()), "from route");
        assert_eq!(
            text(&dispatcher.dispatch("/test_results/20100730/file.txt").unwrap()),
            "result 1"
        );
    }

    #[test]
    fn test_fileserver_escape_is_not_found() {
        let dispatcher = file_site();
        for path in ["/../../../test_results/", "/../../etc/passwd", "/test_results/../../.."] {
            let err = dispatcher.dispatch(path).unwrap_err();
            assert!(err.is_not_found(), "{path}: {err}");
        }
    }

    #[test]
    fn test_fileserver_none_policy_lists_entries() {
        let dispatcher = file_site();
        assert_eq!(
            dispatcher.dispatch("/test_results/").unwrap(),
            Response::Listing(vec!["index.html".to_string(), "20100730".to_string()])
        );
        assert_eq!(
            dispatcher.dispatch("/test_results/20100730").unwrap(),
            Response::Listing(vec!["file.txt".to_string()])
        );
    }

    #[test]
    fn test_fileserver_auto_policy() {
        let dispatcher = file_site();
        dispatcher.config().directory("/test_results").set_auto();

        let expected = "<html><body><a href=\"index.html\">index.html</a><br/>\n\
                        <a href=\"20100730\">20100730</a></body></html>";
        assert_eq!(
            dispatcher.dispatch("/test_results/").unwrap(),
            Response::Html(expected.to_string())
        );
    }

    #[test]
    fn test_fileserver_named_policy() {
        let dispatcher = file_site();
        dispatcher
            .config()
            .directory("/test_results")
            .set_filename("index.html");

        let resp = dispatcher.dispatch("/test_results/").unwrap();
        assert_eq!(text(&resp), "the index");
        assert_eq!(
            resp,
            Response::Content {
                data: b"the index".to_vec(),
                file_name: Some("index.html".to_string()),
            }
        );

        dispatcher
            .config()
            .directory("/test_results/20100730")
            .set_filename("index.html");
        assert!(dispatcher
            .dispatch("/test_results/20100730/")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_fileserver_reads_file() {
        let dispatcher = file_site();
        let resp = dispatcher.dispatch("/test_results/20100730/file.txt").unwrap();
        assert_eq!(text(&resp), "result 1");
        assert!(dispatcher.dispatch("/test_results/missing.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn test_root_directory_policy() {
        let dispatcher = file_site();
        dispatcher.config().directory("/").set_auto();
        assert_eq!(
            dispatcher.dispatch("/").unwrap(),
            Response::Html("<html><body><a href=\"test_results\">test_results</a></body></html>".to_string())
        );
    }

    #[test]
    fn test_auto_header_uses_routes() {
        let mut config = ServerConfig::with_filesystem(Arc::new(woome_fs()));
        config.set_docroot("/home/woome/ci").unwrap();
        config
            .register("/summary/$", |_: &Params| -> HandlerResult {
                Ok(Response::html("<p>1 run</p>"))
            })
            .unwrap();
        let dispatcher = Dispatcher::new(config);
        let dir = dispatcher.config().directory("/test_results");
        dir.set_auto();
        dir.set_header_virtual("/summary");

        let got = dispatcher.dispatch("/test_results").unwrap();
        assert_eq!(
            text(&got),
            "<html><body><p>1 run</p><br/>\n<a href=\"index.html\">index.html</a><br/>\n\
             <a href=\"20100730\">20100730</a></body></html>"
        );
    }

    #[test]
    fn test_resolve_virtual_ignores_files() {
        let dispatcher = file_site();
        assert_eq!(dispatcher.resolve_virtual("/test_results/20100730/file.txt"), None);
    }

    /// Records every path the dispatcher asks the filesystem about
    #[derive(Debug)]
    struct RecordingFs {
        inner: MemoryFs,
        touched: Mutex<Vec<PathBuf>>,
    }

    impl RecordingFs {
        fn touch(&self, path: &Path) {
            self.touched.lock().unwrap().push(path.to_path_buf());
        }
    }

    impl Filesystem for RecordingFs {
        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            self.touch(path);
            self.inner.canonicalize(path)
        }

        fn kind(&self, path: &Path) -> io::Result<EntryKind> {
            self.touch(path);
            self.inner.kind(path)
        }

        fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
            self.touch(path);
            self.inner.list_dir(path)
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.touch(path);
            self.inner.read(path)
        }
    }

    #[test]
    fn test_escape_never_touches_outside_docroot() {
        let fs = Arc::new(RecordingFs {
            inner: MemoryFs::new()
                .with_file("srv/site/index.html", "home")
                .with_file("srv/site-other/file", "secret")
                .with_file("etc/passwd", "root:x:0:0"),
            touched: Mutex::new(Vec::new()),
        });
        let mut config = ServerConfig::with_filesystem(Arc::clone(&fs) as Arc<dyn Filesystem>);
        config.set_docroot("/srv/site").unwrap();
        fs.touched.lock().unwrap().clear();
        let dispatcher = Dispatcher::new(config);

        for path in ["/../../etc/passwd", "/../site-other/file", "/../../../etc/"] {
            assert!(dispatcher.dispatch(path).unwrap_err().is_not_found());
        }
        assert!(fs.touched.lock().unwrap().is_empty());

        dispatcher.dispatch("/index.html").unwrap();
        assert!(fs
            .touched
            .lock()
            .unwrap()
            .iter()
            .all(|p| p.starts_with("/srv/site")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let outside = dir.path().join("site-other");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("secret.txt"), "secret").unwrap();
        std::fs::write(root.join("page.txt"), "page").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link")).unwrap();

        let mut config = ServerConfig::new();
        config.set_docroot(&root).unwrap();
        let dispatcher = Dispatcher::new(config);

        assert_eq!(text(&dispatcher.dispatch("/page.txt").unwrap()), "page");
        assert!(dispatcher.dispatch("/link/secret.txt").unwrap_err().is_not_found());
        assert!(dispatcher.dispatch("/../site-other/secret.txt").unwrap_err().is_not_found());
    }

    #[cfg(unix)]
    #[test]
    fn test_named_index_stays_inside_docroot_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let outside = dir.path().join("site-other");
        std::fs::create_dir_all(root.join("docs")).unwrap();
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("secret.txt"), "secret").unwrap();
        std::fs::write(root.join("docs/real.html"), "real index").unwrap();
        std::os::unix::fs::symlink(outside.join("secret.txt"), root.join("docs/index.html"))
            .unwrap();

        let mut config = ServerConfig::new();
        config.set_docroot(&root).unwrap();
        let dispatcher = Dispatcher::new(config);
        let docs = dispatcher.config().directory("/docs");

        assert!(dispatcher.dispatch("/docs/index.html").unwrap_err().is_not_found());

        let absolute = outside.join("secret.txt").to_string_lossy().into_owned();
        for name in ["index.html", "../../site-other/secret.txt", absolute.as_str()] {
            docs.set_filename(name);
            let err = dispatcher.dispatch("/docs/").unwrap_err();
            assert!(err.is_not_found(), "{name}: {err}");
        }

        docs.set_filename("real.html");
        assert_eq!(text(&dispatcher.dispatch("/docs/").unwrap()), "real index");
    }

    #[test]
    fn test_concurrent_dispatch() {
        let dispatcher = Arc::new(file_site());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        dispatcher.dispatch("/test_results/20100730/file.txt").map(|r| text(&r))
                    } else {
                        dispatcher.dispatch("/test_results/20100730/").map(|r| format!("{r:?}"))
                    }
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(dispatcher.config().directories().len(), 1);
    }
}
