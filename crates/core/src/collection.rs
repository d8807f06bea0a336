//! Collection and scrollable container façades.
//!
//! Both keep only the container's selector, so the agent resolves container
//! and child in one call and nothing goes stale between lookups.

use uiauto_protocol::Selector;
use uiauto_runtime::Result;

use crate::agent::AgentService;
use crate::object::{ChainStep, Handle, UiObject};

/// Default swipe granularity for one scroll step.
const DEFAULT_SCROLL_STEPS: u32 = 55;
/// Upper bound on search swipes when scrolling a child into view.
const DEFAULT_MAX_SEARCH_SWIPES: u32 = 30;

/// A container whose children are addressed relative to it.
pub struct UiCollection {
    agent: AgentService,
    selector: Selector,
}

impl UiCollection {
    pub fn new(agent: AgentService, selector: Selector) -> Self {
        Self { agent, selector }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    fn child_handle(&self, step: ChainStep) -> UiObject {
        UiObject::new(
            self.agent.clone(),
            Handle::Chained {
                parent: Box::new(Handle::Selector(self.selector.clone())),
                step,
            },
        )
    }

    /// A handle for the child matching `child` that carries `text`.
    pub fn child_by_text(&self, child: Selector, text: impl Into<String>) -> UiObject {
        self.child_handle(ChainStep::ChildByText {
            child,
            text: text.into(),
            allow_scroll: None,
        })
    }

    /// A handle for the child matching `child` with the given description.
    pub fn child_by_description(
        &self,
        child: Selector,
        description: impl Into<String>,
    ) -> UiObject {
        self.child_handle(ChainStep::ChildByDescription {
            child,
            description: description.into(),
            allow_scroll: None,
        })
    }

    /// A handle for the nth child matching `child`.
    pub fn child_by_instance(&self, child: Selector, instance: u32) -> UiObject {
        self.child_handle(ChainStep::ChildByInstance { child, instance })
    }
}

/// A scrollable container; collection lookups may scroll to find a child.
pub struct UiScrollable {
    collection: UiCollection,
    vertical: bool,
    max_search_swipes: u32,
}

impl UiScrollable {
    /// Vertical orientation is assumed until changed; most Android lists
    /// scroll vertically.
    pub fn new(agent: AgentService, selector: Selector) -> Self {
        Self {
            collection: UiCollection::new(agent, selector),
            vertical: true,
            max_search_swipes: DEFAULT_MAX_SEARCH_SWIPES,
        }
    }

    pub fn as_horizontal(mut self) -> Self {
        self.vertical = false;
        self
    }

    pub fn as_vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn max_search_swipes(&self) -> u32 {
        self.max_search_swipes
    }

    /// Caps how many swipes a scrolling child search may take. The bound is
    /// applied on the agent per call; nothing is stored remotely.
    pub fn set_max_search_swipes(&mut self, swipes: u32) {
        self.max_search_swipes = swipes;
    }

    fn agent(&self) -> &AgentService {
        &self.collection.agent
    }

    fn selector(&self) -> &Selector {
        &self.collection.selector
    }

    /// Collection lookup that scrolls the container while searching.
    pub fn child_by_text(&self, child: Selector, text: impl Into<String>) -> UiObject {
        self.collection.child_handle(ChainStep::ChildByText {
            child,
            text: text.into(),
            allow_scroll: Some(true),
        })
    }

    pub fn child_by_description(
        &self,
        child: Selector,
        description: impl Into<String>,
    ) -> UiObject {
        self.collection.child_handle(ChainStep::ChildByDescription {
            child,
            description: description.into(),
            allow_scroll: Some(true),
        })
    }

    pub fn child_by_instance(&self, child: Selector, instance: u32) -> UiObject {
        self.collection.child_by_instance(child, instance)
    }

    /// Scrolls until an element matching `target` is in view.
    pub async fn scroll_into_view(&self, target: &Selector) -> Result<bool> {
        self.agent()
            .scroll_to(self.selector(), target, self.vertical)
            .await
    }

    /// Scrolls until an element with the exact text is in view.
    pub async fn scroll_text_into_view(&self, text: &str) -> Result<bool> {
        self.scroll_into_view(&Selector::new().text(text)).await
    }

    /// Scrolls until an element with the exact description is in view.
    pub async fn scroll_description_into_view(&self, description: &str) -> Result<bool> {
        self.scroll_into_view(&Selector::new().description(description))
            .await
    }

    pub async fn scroll_forward(&self) -> Result<bool> {
        self.scroll_forward_steps(DEFAULT_SCROLL_STEPS).await
    }

    pub async fn scroll_forward_steps(&self, steps: u32) -> Result<bool> {
        self.agent()
            .scroll_forward(self.selector(), self.vertical, steps)
            .await
    }

    pub async fn scroll_backward(&self) -> Result<bool> {
        self.scroll_backward_steps(DEFAULT_SCROLL_STEPS).await
    }

    pub async fn scroll_backward_steps(&self, steps: u32) -> Result<bool> {
        self.agent()
            .scroll_backward(self.selector(), self.vertical, steps)
            .await
    }

    pub async fn scroll_to_beginning(&self) -> Result<bool> {
        self.agent()
            .scroll_to_beginning(
                self.selector(),
                self.vertical,
                self.max_search_swipes,
                DEFAULT_SCROLL_STEPS,
            )
            .await
    }

    pub async fn scroll_to_end(&self) -> Result<bool> {
        self.agent()
            .scroll_to_end(
                self.selector(),
                self.vertical,
                self.max_search_swipes,
                DEFAULT_SCROLL_STEPS,
            )
            .await
    }

    pub async fn fling_forward(&self) -> Result<bool> {
        self.agent().fling_forward(self.selector(), self.vertical).await
    }

    pub async fn fling_backward(&self) -> Result<bool> {
        self.agent().fling_backward(self.selector(), self.vertical).await
    }

    pub async fn fling_to_beginning(&self) -> Result<bool> {
        self.agent()
            .fling_to_beginning(self.selector(), self.vertical, self.max_search_swipes)
            .await
    }

    pub async fn fling_to_end(&self) -> Result<bool> {
        self.agent()
            .fling_to_end(self.selector(), self.vertical, self.max_search_swipes)
            .await
    }
}
