//! Page shell with a deferred child component.
//!
//! The shell renders a static heading immediately and mounts one child whose
//! loader does not run until the child is first needed. Until then the child
//! slot renders the fallback (empty).
//!
//! # Example
//!
//! ```rust,ignore
//! use medrec_sdk::page::{home_page, Component, LoadError};
//! use std::sync::Arc;
//!
//! let page = home_page(|| async { Ok(Arc::new(RecordForm) as Arc<dyn Component>) });
//! assert!(page.render().is_fallback());
//! let html = page.render_ready().await?.to_html();
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_lock::OnceCell;
use thiserror::Error;

/// Heading of the mint page.
pub const HOME_HEADING: &str = "Tạo NFT";

// ============================================================================
// Components
// ============================================================================

/// A renderable unit of markup.
pub trait Component: Send + Sync {
    fn render(&self) -> String;
}

/// Static markup as a component.
impl Component for String {
    fn render(&self) -> String {
        self.clone()
    }
}

/// Error raised by a deferred component loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Component load failed: {0}")]
    Failed(String),
}

impl LoadError {
    pub fn failed(message: impl Into<String>) -> Self {
        LoadError::Failed(message.into())
    }
}

type LoadFuture = Pin<Box<dyn Future<Output = Result<Arc<dyn Component>, LoadError>> + Send>>;
type Loader = Box<dyn Fn() -> LoadFuture + Send + Sync>;

/// A component whose loader runs on first use.
///
/// At most one load is in flight; concurrent callers await the same load. A
/// failed load leaves the component unloaded so a later call retries.
///
/// Nothing here spawns tasks. A synchronous render only marks the load as
/// requested; the host drives it with [`LazyComponent::load`] (or
/// [`PageShell::render_ready`]) on its own executor.
pub struct LazyComponent {
    loader: Loader,
    cell: OnceCell<Arc<dyn Component>>,
    requested: AtomicBool,
}

impl LazyComponent {
    /// Store `loader` without running it.
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn Component>, LoadError>> + Send + 'static,
    {
        Self {
            loader: Box::new(move || -> LoadFuture { Box::pin(loader()) }),
            cell: OnceCell::new(),
            requested: AtomicBool::new(false),
        }
    }

    /// The loaded component, if the load has completed.
    pub fn get(&self) -> Option<&Arc<dyn Component>> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.is_initialized()
    }

    /// Whether a render or load has asked for the component.
    pub fn is_load_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    fn request_load(&self) {
        if !self.requested.swap(true, Ordering::AcqRel) {
            tracing::debug!("Deferred component requested");
        }
    }

    /// Run the loader if needed and return the component.
    pub async fn load(&self) -> Result<&Arc<dyn Component>, LoadError> {
        self.request_load();
        self.cell
            .get_or_try_init(|| async {
                tracing::debug!("Loading deferred component");
                let result = (self.loader)().await;
                if let Err(e) = &result {
                    tracing::warn!("Deferred component failed to load: {}", e);
                }
                result
            })
            .await
    }
}

impl fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("requested", &self.is_load_requested())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// ============================================================================
// Page Shell
// ============================================================================

/// Contents of the child slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Child not loaded yet
    Fallback,
    /// Rendered child markup
    Ready(String),
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub heading: String,
    pub body: Body,
}

impl RenderedPage {
    pub fn is_fallback(&self) -> bool {
        self.body == Body::Fallback
    }

    /// `<div><div><h2>heading</h2>body</div></div>`; the fallback is empty.
    /// The heading is escaped, the body is markup and is inserted as-is.
    pub fn to_html(&self) -> String {
        let body = match &self.body {
            Body::Fallback => "",
            Body::Ready(html) => html.as_str(),
        };
        format!(
            "<div><div><h2>{}</h2>{}</div></div>",
            escape_html(&self.heading),
            body
        )
    }
}

/// Escape text for use in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// A heading plus one deferred child.
#[derive(Debug)]
pub struct PageShell {
    heading: String,
    child: LazyComponent,
}

impl PageShell {
    pub fn new(heading: impl Into<String>, child: LazyComponent) -> Self {
        Self {
            heading: heading.into(),
            child,
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn child(&self) -> &LazyComponent {
        &self.child
    }

    /// Render without waiting. The heading is always present; the body is the
    /// fallback until the child has loaded. A fallback render marks the child
    /// as requested but does not start the loader.
    pub fn render(&self) -> RenderedPage {
        let body = match self.child.get() {
            Some(child) => Body::Ready(child.render()),
            None => {
                self.child.request_load();
                Body::Fallback
            }
        };
        RenderedPage {
            heading: self.heading.clone(),
            body,
        }
    }

    /// Load the child if needed, then render with it.
    pub async fn render_ready(&self) -> Result<RenderedPage, LoadError> {
        let child = self.child.load().await?;
        Ok(RenderedPage {
            heading: self.heading.clone(),
            body: Body::Ready(child.render()),
        })
    }
}

/// The mint page: heading [`HOME_HEADING`] over the deferred record form.
pub fn home_page<F, Fut>(loader: F) -> PageShell
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<dyn Component>, LoadError>> + Send + 'static,
{
    PageShell::new(HOME_HEADING, LazyComponent::new(loader))
}
