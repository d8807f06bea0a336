//! Remote element handles.
//!
//! A [`UiObject`] names an element without holding one. Plain selector
//! handles send the selector with every call; chained handles resolve a
//! fresh remote id for every action, so the agent always works against the
//! current screen. Nothing is cached between calls.

use std::pin::Pin;

use tracing::trace;
use uiauto_protocol::{Corner, ObjInfo, Selector, SwipeDirection};
use uiauto_runtime::{Error, Result};

use crate::agent::{AgentService, RemoteObjectId};

/// How a handle names its element.
#[derive(Debug, Clone)]
pub enum Handle {
    /// Named directly by a selector evaluated from the screen root.
    Selector(Selector),
    /// Named relative to another handle.
    Chained { parent: Box<Handle>, step: ChainStep },
}

/// One relative lookup applied to a parent handle.
#[derive(Debug, Clone)]
pub enum ChainStep {
    /// Search the parent's children.
    Child(Selector),
    /// Search from the parent's parent downward.
    FromParent(Selector),
    /// Search a collection container for a child carrying the given text.
    ChildByText {
        child: Selector,
        text: String,
        allow_scroll: Option<bool>,
    },
    /// Search a collection container by content description.
    ChildByDescription {
        child: Selector,
        description: String,
        allow_scroll: Option<bool>,
    },
    /// Take the nth match of the child selector inside the container.
    ChildByInstance { child: Selector, instance: u32 },
}

impl Handle {
    /// Resolves this handle to a remote id against the current screen.
    ///
    /// Collection steps require the container to be a plain selector so the
    /// agent can resolve container and child in a single call.
    pub fn resolve<'a>(
        &'a self,
        agent: &'a AgentService,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteObjectId>> + Send + 'a>> {
        Box::pin(async move {
            match self {
                Handle::Selector(selector) => agent.get_ui_object(selector).await,
                Handle::Chained { parent, step } => match step {
                    ChainStep::Child(selector) => {
                        let id = parent.resolve(agent).await?;
                        agent.get_child(&id, selector).await
                    }
                    ChainStep::FromParent(selector) => {
                        let id = parent.resolve(agent).await?;
                        agent.get_from_parent(&id, selector).await
                    }
                    ChainStep::ChildByText {
                        child,
                        text,
                        allow_scroll,
                    } => {
                        let container = parent.container_selector()?;
                        match allow_scroll {
                            Some(scroll) => {
                                agent
                                    .child_by_text_with_scroll(container, child, text, *scroll)
                                    .await
                            }
                            None => agent.child_by_text(container, child, text).await,
                        }
                    }
                    ChainStep::ChildByDescription {
                        child,
                        description,
                        allow_scroll,
                    } => {
                        let container = parent.container_selector()?;
                        match allow_scroll {
                            Some(scroll) => {
                                agent
                                    .child_by_description_with_scroll(
                                        container,
                                        child,
                                        description,
                                        *scroll,
                                    )
                                    .await
                            }
                            None => {
                                agent
                                    .child_by_description(container, child, description)
                                    .await
                            }
                        }
                    }
                    ChainStep::ChildByInstance { child, instance } => {
                        let container = parent.container_selector()?;
                        agent.child_by_instance(container, child, *instance).await
                    }
                },
            }
        })
    }

    fn container_selector(&self) -> Result<&Selector> {
        match self {
            Handle::Selector(selector) => Ok(selector),
            Handle::Chained { .. } => Err(Error::Unsupported(
                "collection lookup on a chained container".to_owned(),
            )),
        }
    }
}

/// A lazy handle to one on-screen element.
#[derive(Clone)]
pub struct UiObject {
    agent: AgentService,
    handle: Handle,
}

impl UiObject {
    pub fn new(agent: AgentService, handle: Handle) -> Self {
        Self { agent, handle }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// A handle to a child of this element.
    pub fn child(&self, selector: Selector) -> UiObject {
        self.chained(ChainStep::Child(selector))
    }

    /// A handle resolved from this element's parent subtree.
    pub fn from_parent(&self, selector: Selector) -> UiObject {
        self.chained(ChainStep::FromParent(selector))
    }

    pub(crate) fn chained(&self, step: ChainStep) -> UiObject {
        UiObject {
            agent: self.agent.clone(),
            handle: Handle::Chained {
                parent: Box::new(self.handle.clone()),
                step,
            },
        }
    }

    async fn resolve(&self) -> Result<RemoteObjectId> {
        self.handle.resolve(&self.agent).await
    }

    /// Whether the element is on screen right now.
    ///
    /// Plain selector handles ask the agent directly. Chained handles
    /// attempt one resolution and read a not-found answer as absent; any
    /// other failure propagates.
    pub async fn exists(&self) -> Result<bool> {
        match &self.handle {
            Handle::Selector(selector) => self.agent.exist(selector).await,
            Handle::Chained { .. } => match self.resolve().await {
                Ok(_) => Ok(true),
                Err(error) if error.is_not_found() => Ok(false),
                Err(error) => Err(error),
            },
        }
    }

    /// Waits up to `timeout_ms` for the element to appear.
    ///
    /// Only plain selector handles wait on the agent side; a chained handle
    /// is probed once, since the agent cannot re-evaluate the chain itself.
    pub async fn wait_for_exists(&self, timeout_ms: u64) -> Result<bool> {
        match &self.handle {
            Handle::Selector(selector) => self.agent.wait_for_exists(selector, timeout_ms).await,
            Handle::Chained { .. } => {
                trace!("chained handle probed once instead of waiting");
                self.exists().await
            }
        }
    }

    /// Waits up to `timeout_ms` for the element to leave the screen.
    ///
    /// For a chained handle this is a single probe: failing to resolve
    /// means the element is already gone.
    pub async fn wait_until_gone(&self, timeout_ms: u64) -> Result<bool> {
        match &self.handle {
            Handle::Selector(selector) => self.agent.wait_until_gone(selector, timeout_ms).await,
            Handle::Chained { .. } => match self.resolve().await {
                Ok(_) => Ok(false),
                Err(error) if error.is_not_found() => Ok(true),
                Err(error) => Err(error),
            },
        }
    }

    pub async fn info(&self) -> Result<ObjInfo> {
        let id = self.resolve().await?;
        self.agent.obj_info(&id).await
    }

    pub async fn text(&self) -> Result<String> {
        let id = self.resolve().await?;
        self.agent.get_text(&id).await
    }

    pub async fn click(&self) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.click(&id).await
    }

    pub async fn click_corner(&self, corner: Corner) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.click_corner(&id, corner).await
    }

    pub async fn click_and_wait_for_new_window(&self, timeout_ms: u64) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.click_and_wait_for_new_window(&id, timeout_ms).await
    }

    pub async fn long_click(&self) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.long_click(&id).await
    }

    pub async fn long_click_corner(&self, corner: Corner) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.long_click_corner(&id, corner).await
    }

    pub async fn set_text(&self, text: &str) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.set_text(&id, text).await
    }

    pub async fn clear_text_field(&self) -> Result<()> {
        let id = self.resolve().await?;
        self.agent.clear_text_field(&id).await
    }

    pub async fn swipe(&self, direction: SwipeDirection, steps: u32) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.swipe_element(&id, direction, steps).await
    }

    pub async fn drag_to_point(&self, x: i32, y: i32, steps: u32) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.drag_to_point(&id, x, y, steps).await
    }

    pub async fn drag_to(&self, target: &Selector, steps: u32) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.drag_to_selector(&id, target, steps).await
    }

    pub async fn pinch_in(&self, percent: u32, steps: u32) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.pinch_in(&id, percent, steps).await
    }

    pub async fn pinch_out(&self, percent: u32, steps: u32) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent.pinch_out(&id, percent, steps).await
    }

    pub async fn gesture(
        &self,
        start1: (i32, i32),
        start2: (i32, i32),
        end1: (i32, i32),
        end2: (i32, i32),
        steps: u32,
    ) -> Result<bool> {
        let id = self.resolve().await?;
        self.agent
            .gesture(&id, start1, start2, end1, end2, steps)
            .await
    }
}
