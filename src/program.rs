//! Mounting a [`Model`] into the browser document.
//!
//! The app keeps a headless [`Program`] and, after every update, applies the
//! difference between the previous and the new view to the live DOM.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use log::LevelFilter;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element as DomElement, Node, NodeList};

use crate::diff::{diff_vdom, Delta, Diff};
use crate::event::{self, Dispatcher, Event, EventId, Listener};
use crate::html::{Attribute, Tag};
use crate::{util, Cmd, Element, Html, JsResult, JsValue, Model, Program, Str};

/// How and where an app is mounted
#[derive(Clone, Debug)]
pub struct Config {
    /// Id of the host element. Its contents are replaced by the app.
    pub target: Str,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            target: "app".into(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn target(mut self, target: impl Into<Str>) -> Config {
        self.target = target.into();
        self
    }

    pub fn log_level(mut self, level: LevelFilter) -> Config {
        self.log_level = level;
        self
    }
}

/// Mount the model into the element with id `target`
pub fn run<M: Model>(model: M, target: &str) -> JsResult<()> {
    run_with(model, Config::default().target(target.to_string()))
}

thread_local! {
    // Mounted apps live until the page goes away
    static MOUNTED: RefCell<Vec<Rc<dyn Any>>> = RefCell::new(Vec::new());
}

pub fn run_with<M: Model>(model: M, config: Config) -> JsResult<()> {
    console_error_panic_hook::set_once();
    util::init_logging(config.log_level);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let target = document
        .get_element_by_id(&config.target)
        .ok_or_else(|| JsValue::from_str(&format!("Target element #{} not found", config.target)))?;
    let initial = document.create_element(&Tag::Div.to_string())?;
    target.set_inner_html(""); // blank the target and create an initial root
    target.append_child(&initial)?;

    let app = Rc::new_cyclic(|weak: &Weak<RefCell<App<M>>>| {
        RefCell::new(App {
            document,
            target,
            program: Program::new(model),
            listeners: HashMap::new(),
            dispatch: dispatcher(weak.clone()),
        })
    });
    app.borrow_mut().mount()?;
    info!("Mounted app on #{}", config.target);

    MOUNTED.with(|mounted| mounted.borrow_mut().push(app));
    Ok(())
}

/// Builds the callback every DOM listener uses to feed the app
fn dispatcher<M: Model>(app: Weak<RefCell<App<M>>>) -> Dispatcher<M> {
    Rc::new(move |cmd: Cmd<M::Msg>| {
        let rc = match app.upgrade() {
            Some(rc) => rc,
            None => {
                warn!("Event received after the app was dropped");
                return;
            }
        };
        // Handlers run one at a time, so a failed borrow means an event was
        // fired synchronously from inside a DOM update
        let mut app = match rc.try_borrow_mut() {
            Ok(app) => app,
            Err(_) => {
                error!("Event fired while the app was updating, ignored");
                return;
            }
        };
        if let Err(e) = app.update(cmd) {
            error!("Update failed: {:?}", e);
        }
    })
}

type Listeners<M> = HashMap<EventId, (usize, Vec<Listener<M>>)>;

/// The app running in the page.
///
/// Any side-effect is handled ONLY through passing a `Cmd` to the `update` function.
/// This ensures the functional reactive loop (command -> update -> view -> command...)
/// is never broken
struct App<M: Model> {
    document: Document,
    target: DomElement,
    program: Program<M>,
    listeners: Listeners<M>,
    dispatch: Dispatcher<M>,
}

impl<M: Model> Drop for App<M> {
    fn drop(&mut self) {
        warn!("Dropping app")
    }
}

impl<M: Model + Debug> Debug for App<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "App ({:?})", self.program)
    }
}

impl<M: Model> App<M> {
    /// Render the first view into the empty root created by `run_with`
    fn mount(&mut self) -> JsResult<()> {
        let blank: Html<M> = Element::tag(Tag::Div).into();
        let App {
            document,
            target,
            program,
            listeners,
            dispatch,
        } = self;
        let diff = diff_vdom(&blank, program.view());
        let mut patcher = Patcher {
            doc: document,
            listeners,
            dispatch,
        };
        patcher.render_diff(target, &[(0, diff)])
    }

    fn update(&mut self, cmd: Cmd<M::Msg>) -> JsResult<()> {
        let old_vdom = match self.program.step(cmd) {
            Some(old) => old,
            None => return Ok(()),
        };
        let App {
            document,
            target,
            program,
            listeners,
            dispatch,
        } = self;
        let diff = diff_vdom(&old_vdom, program.view());
        if diff.is_unchanged() {
            trace!("No change");
            return Ok(());
        }
        trace!("vdom diff: {:?}", diff);
        let mut patcher = Patcher {
            doc: document,
            listeners,
            dispatch,
        };
        patcher.render_diff(target, &[(0, diff)])?;
        trace!("Registered events: {}", listeners_len(patcher.listeners));
        Ok(())
    }
}

fn listeners_len<M: Model>(listeners: &Listeners<M>) -> usize {
    listeners.values().map(|(ct, _)| ct).sum()
}

/// Applies a diff to the DOM, keeping the listener registry in step
struct Patcher<'a, M: Model> {
    doc: &'a Document,
    listeners: &'a mut Listeners<M>,
    dispatch: &'a Dispatcher<M>,
}

impl<'a, M: Model> Patcher<'a, M> {
    fn render_diff(&mut self, this_el: &Node, child_diffs: &[(u32, Diff<'_, M>)]) -> JsResult<()> {
        // This might seem slightly odd. Why are we applying changes to the children
        // rather than this_el? Because we need to create, remove, replace them and
        // these operations can only be done from the parent node
        if child_diffs.is_empty() {
            return Ok(());
        }
        let child_els = this_el.child_nodes();
        let mut rmct = 0;
        for (ix, diff) in child_diffs {
            let ix = *ix - rmct; // adjust index for previously-removed nodes
            match diff {
                Diff::Unchanged => (),
                Diff::Insert(node) => {
                    // only ever at the tail, see `diff_vdom`
                    let new_el = self.render(node)?;
                    this_el.append_child(&new_el)?;
                }
                Diff::Replace {
                    with: node,
                    events_to_rm,
                } => {
                    for event_id in events_to_rm {
                        self.remove_event_listener(event_id);
                    }
                    let old_el = child_at(&child_els, ix)?;
                    let new_el = self.render(node)?;
                    this_el.replace_child(&new_el, &old_el)?;
                }
                Diff::Remove { events_to_rm } => {
                    for event_id in events_to_rm {
                        self.remove_event_listener(event_id);
                    }
                    let old_el = child_at(&child_els, ix)?;
                    this_el.remove_child(&old_el)?;
                    rmct += 1;
                }
                Diff::Update {
                    attrs,
                    events,
                    children,
                } => {
                    let child_el = child_at(&child_els, ix)?;
                    if !events.is_empty() || !attrs.is_empty() {
                        let el: &DomElement = child_el
                            .dyn_ref()
                            .ok_or_else(|| JsValue::from_str("Not an element"))?;
                        self.update_events(el, events)?;
                        update_attrs(el, attrs)?;
                    }
                    self.render_diff(&child_el, children)?;
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, node: &Html<M>) -> JsResult<Node> {
        match node {
            Html::Text(text) => Ok(self.doc.create_text_node(text).unchecked_into()),
            Html::Element(elem) => self.render_element(elem).map(|el| el.unchecked_into()),
        }
    }

    fn render_element(&mut self, elem: &Element<M>) -> JsResult<DomElement> {
        let element = self.doc.create_element(&elem.tag.to_string())?;
        for attr in &elem.attrs {
            add_attr_to_element(attr, &element)?;
        }
        for event in &elem.events {
            self.attach(event, &element)?;
        }
        for child in &elem.children {
            let child_elem = self.render(child)?;
            element.append_child(&child_elem)?;
        }
        Ok(element)
    }

    fn attach(&mut self, event: &Event<M>, element: &DomElement) -> JsResult<()> {
        let listener = event::attach_event_listener(event, element, self.dispatch.clone())?;
        self.stash_event_listener(event.id(), listener);
        Ok(())
    }

    fn stash_event_listener(&mut self, id: EventId, listener: Listener<M>) {
        // The EventId is not unique when the "same" handler sits on several
        // nodes at once, so listeners are refcounted per id and all of them are
        // kept alive until none is needed any more
        let entry = self.listeners.entry(id).or_insert((0, Vec::new()));
        entry.0 += 1; // increment refct
        entry.1.push(listener);
    }

    fn remove_event_listener(&mut self, id: &EventId) {
        if let Some(entry) = self.listeners.get_mut(id) {
            entry.0 -= 1;
            if entry.0 == 0 {
                // dropping the listeners detaches them from the DOM
                self.listeners.remove(id);
            }
        }
    }

    fn update_events(&mut self, element: &DomElement, events: &[Delta<&Event<M>>]) -> JsResult<()> {
        for delta in events {
            match delta {
                Delta::Add(event) => self.attach(event, element)?,
                Delta::Remove(event) => self.remove_event_listener(&event.id()),
            }
        }
        Ok(())
    }
}

fn child_at(nodes: &NodeList, ix: u32) -> JsResult<Node> {
    nodes
        .get(ix)
        .ok_or_else(|| JsValue::from_str(&format!("No child node at index {}", ix)))
}

fn add_attr_to_element(attr: &Attribute, element: &DomElement) -> JsResult<()> {
    element.set_attribute(attr.key(), attr.value())?;
    if let Attribute::Value(val) = attr {
        // The attribute only holds the initial value. The property is what the
        // user sees, and it must be written for a cleared form to show as empty.
        let current = util::get_str_prop(element, "value").ok();
        if let Some(val) = value_prop_update(current.as_deref(), val) {
            util::set_str_prop(element, "value", val)?;
        }
    }
    Ok(())
}

/// The value to write to a field's live `value` property, if any.
///
/// Writing an unchanged value would move the caret to the end of the field.
fn value_prop_update<'a>(current: Option<&str>, wanted: &'a str) -> Option<&'a str> {
    if current == Some(wanted) {
        None
    } else {
        Some(wanted)
    }
}

fn remove_attr_from_element(attr: &Attribute, element: &DomElement) -> JsResult<()> {
    element.remove_attribute(attr.key())
}

fn update_attrs(element: &DomElement, attrs: &[Delta<&Attribute>]) -> JsResult<()> {
    for delta in attrs {
        match delta {
            Delta::Add(attr) => add_attr_to_element(attr, element)?,
            Delta::Remove(attr) => remove_attr_from_element(attr, element)?,
        }
    }
    Ok(())
}
