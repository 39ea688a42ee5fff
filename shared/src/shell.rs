//! A headless Rust shell: drives the core and fulfils its collection effects with a
//! [`CollectionService`].

use crux_core::Core;
use futures::future::join_all;
use tracing::trace;

use crate::app::App;
use crate::capabilities::Effect;
use crate::event::Event;
use crate::service::{perform, CollectionService};
use crate::view::ViewModel;

pub struct GalleryShell<S> {
    core: Core<Effect, App>,
    service: S,
    renders: usize,
}

impl<S> GalleryShell<S>
where
    S: CollectionService,
{
    pub fn new(service: S) -> Self {
        Self {
            core: Core::new(),
            service,
            renders: 0,
        }
    }

    /// Loads the collection and the current user.
    pub async fn start(&mut self) -> ViewModel {
        self.dispatch(Event::Initialize).await
    }

    /// Feeds `event` to the core and resolves collection effects until none remain.
    /// Effects emitted together are performed concurrently.
    pub async fn dispatch(&mut self, event: Event) -> ViewModel {
        let mut effects = self.core.process_event(event);

        while !effects.is_empty() {
            let mut requests = Vec::new();
            for effect in effects {
                match effect {
                    Effect::Render(_) => self.renders += 1,
                    Effect::Collection(request) => requests.push(request),
                }
            }

            let outputs = join_all(requests.iter().map(|request| {
                trace!(operation = request.operation.name(), "performing collection request");
                perform(&self.service, request.operation.clone())
            }))
            .await;

            effects = Vec::new();
            for (mut request, output) in requests.into_iter().zip(outputs) {
                effects.extend(self.core.resolve(&mut request, output));
            }
        }

        self.core.view()
    }

    #[must_use]
    pub fn view(&self) -> ViewModel {
        self.core.view()
    }

    /// Number of render requests the core has made.
    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }
}
