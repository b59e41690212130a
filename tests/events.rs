use signpost::EventRegistry;

fn published(events: &mut EventRegistry<&'static str>, name: &str) -> Vec<&'static str> {
    let mut seen = Vec::new();
    events.publish(name, |label| seen.push(*label));
    seen
}

#[test]
fn publish_runs_handlers_in_subscription_order() {
    let mut events = EventRegistry::new();
    events.subscribe("boot", "first");
    events.subscribe("boot", "second");
    events.subscribe("other", "elsewhere");

    assert_eq!(published(&mut events, "boot"), ["first", "second"]);
    // publishing again fires them again
    assert_eq!(published(&mut events, "boot"), ["first", "second"]);
}

#[test]
fn once_handlers_fire_after_normal_handlers_and_exactly_once() {
    let mut events = EventRegistry::new();
    events.subscribe_once("boot", "once");
    events.subscribe("boot", "always");

    assert_eq!(published(&mut events, "boot"), ["always", "once"]);
    assert_eq!(published(&mut events, "boot"), ["always"]);
}

#[test]
fn publish_and_unsubscribe_unknown_names_are_noops() {
    let mut events: EventRegistry<&'static str> = EventRegistry::new();
    // nothing registered at all, not even a once-list
    assert_eq!(published(&mut events, "ghost"), Vec::<&str>::new());
    events.unsubscribe("ghost");
    assert!(!events.contains("ghost"));
}

#[test]
fn unsubscribe_name_removes_normal_and_once_handlers() {
    let mut events = EventRegistry::new();
    events.subscribe("boot", "normal");
    events.subscribe_once("boot", "once");
    events.subscribe("keep", "kept");

    events.unsubscribe("boot");

    assert!(!events.contains("boot"));
    assert_eq!(published(&mut events, "boot"), Vec::<&str>::new());
    assert_eq!(published(&mut events, "keep"), ["kept"]);
}

#[test]
fn tokens_identify_registrations_not_handler_contents() {
    let mut events = EventRegistry::new();
    // structurally identical handlers still get independent tokens
    let first = events.subscribe("boot", "same");
    let second = events.subscribe("boot", "same");
    assert_ne!(first, second);

    assert!(events.unsubscribe_handler("boot", first));
    assert_eq!(published(&mut events, "boot"), ["same"]);

    // a token removes at most one registration
    assert!(!events.unsubscribe_handler("boot", first));
    assert!(events.unsubscribe_handler("boot", second));
    assert!(!events.contains("boot"));
}

#[test]
fn tokens_remove_once_handlers_too() {
    let mut events = EventRegistry::new();
    let token = events.subscribe_once("boot", "once");
    events.subscribe("boot", "always");

    assert!(events.unsubscribe_handler("boot", token));
    assert_eq!(published(&mut events, "boot"), ["always"]);
}

#[test]
fn unsubscribe_all_clears_everything() {
    let mut events = EventRegistry::new();
    events.subscribe("a", "a");
    events.subscribe_once("b", "b");

    events.unsubscribe_all();

    assert!(!events.contains("a"));
    assert!(!events.contains("b"));
    assert_eq!(published(&mut events, "a"), Vec::<&str>::new());
    assert_eq!(published(&mut events, "b"), Vec::<&str>::new());
}

#[test]
fn registry_holds_closures() {
    use std::sync::{Arc, Mutex};

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut events: EventRegistry<Box<dyn Fn(u32)>> = EventRegistry::new();
    {
        let log = log.clone();
        events.subscribe("tick", Box::new(move |n| log.lock().unwrap().push(n)));
    }

    events.publish("tick", |handler| handler(7));
    events.publish("tick", |handler| handler(9));
    assert_eq!(*log.lock().unwrap(), [7, 9]);
}
