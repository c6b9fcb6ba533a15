//! Lifecycle of the process-wide document registry.
//!
//! The registry is global, so the whole lifecycle runs in one test.

use wombat::{Dom, Error, registry};

#[test]
fn test_registry_lifecycle() {
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::mount("main", Dom::new()),
        Err(Error::RegistryNotInitialized)
    ));

    registry::init();
    let mut dom = Dom::new();
    dom.load_str(r#"<div class="all"><br><p>Hey bro</p></div><br class="both" />"#)
        .unwrap();
    assert!(registry::mount("main", dom).unwrap().is_none());
    assert!(registry::mount("empty", Dom::new()).unwrap().is_none());
    assert_eq!(registry::names().unwrap(), vec!["empty", "main"]);

    // Queries go through closures
    let brs = registry::with_document("main", |dom| dom.find("br").map(|found| found.len()));
    assert_eq!(brs.unwrap().unwrap(), 2);
    let unloaded = registry::with_document("empty", |dom| dom.find("br"));
    assert!(matches!(unloaded, Ok(Err(Error::NotLoaded))));

    registry::with_document_mut("main", |dom| dom.load_str("<p>new</p>"))
        .unwrap()
        .unwrap();
    assert_eq!(
        registry::with_document("main", ToString::to_string).unwrap(),
        "<p>new</p>"
    );

    // Mounting over a name hands back the old document
    let previous = registry::mount("main", Dom::new()).unwrap().unwrap();
    assert_eq!(previous.to_string(), "<p>new</p>");

    assert!(!registry::unmount("main").unwrap().is_loaded());
    assert!(matches!(
        registry::unmount("main"),
        Err(Error::UnknownDocument(name)) if name == "main"
    ));

    // A second init keeps what is mounted
    registry::init();
    assert_eq!(registry::names().unwrap(), vec!["empty"]);

    registry::reset();
    assert!(!registry::is_initialized());
    assert!(matches!(
        registry::with_document("empty", |_| ()),
        Err(Error::RegistryNotInitialized)
    ));
}
