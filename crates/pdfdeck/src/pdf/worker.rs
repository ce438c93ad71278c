use std::collections::VecDeque;
use std::thread::JoinHandle;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace, warn};

use super::pdfium::PdfiumEngine;
use super::{PageBitmap, PdfEngine, PdfError};
use crate::viewer::ingest::{FileSource, LoadRequest};
use crate::viewer::source::RenderRequest;

#[derive(Debug)]
pub enum PdfRequest {
    Load(LoadRequest),
    /// The viewer accepted the decode with this load token; make it the
    /// document renders are served from.
    Activate { document: u64 },
    Render(RenderRequest),
}

#[derive(Debug)]
pub enum PdfReply {
    Loaded {
        token: u64,
        page_count: usize,
        name: String,
    },
    LoadFailed {
        token: u64,
        error: PdfError,
    },
    Rendered {
        token: u64,
        bitmap: PageBitmap,
    },
    RenderFailed {
        token: u64,
        error: PdfError,
    },
}

/// Handle to the thread that owns the PDF engine and the current document.
///
/// Requests are processed in order. Replies carry the token of the request
/// they answer; the viewer decides whether they are still wanted. Dropping
/// the handle closes the request channel and the thread exits.
pub struct PdfWorker {
    requests: UnboundedSender<PdfRequest>,
    replies: UnboundedReceiver<PdfReply>,
    _thread: JoinHandle<()>,
}

impl PdfWorker {
    /// Start a worker backed by PDFium. `wake` is called after every reply
    /// so an idle UI can pick it up.
    pub fn spawn(wake: impl Fn() + Send + 'static) -> std::io::Result<Self> {
        Self::spawn_with(PdfiumEngine::bind, wake)
    }

    pub fn spawn_with<E, F, W>(make_engine: F, wake: W) -> std::io::Result<Self>
    where
        E: PdfEngine + 'static,
        F: FnOnce() -> Result<E, PdfError> + Send + 'static,
        W: Fn() + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();

        let thread = std::thread::Builder::new()
            .name("pdf-worker".to_string())
            .spawn(move || {
                debug!("PDF worker started");
                serve(make_engine(), request_rx, |reply| {
                    if reply_tx.send(reply).is_ok() {
                        wake();
                    }
                });
                debug!("PDF worker stopped");
            })?;

        Ok(Self {
            requests: request_tx,
            replies: reply_rx,
            _thread: thread,
        })
    }

    pub fn submit(&self, request: PdfRequest) {
        if self.requests.send(request).is_err() {
            warn!("PDF worker is gone; request dropped");
        }
    }

    pub fn try_recv(&mut self) -> Option<PdfReply> {
        self.replies.try_recv().ok()
    }
}

fn serve<E: PdfEngine>(
    engine: Result<E, PdfError>,
    mut requests: UnboundedReceiver<PdfRequest>,
    mut reply: impl FnMut(PdfReply),
) {
    let engine = match engine {
        Ok(engine) => engine,
        Err(error) => {
            warn!("{error}");
            let message = error.to_string();
            while let Some(request) = requests.blocking_recv() {
                match request {
                    PdfRequest::Load(load) => reply(PdfReply::LoadFailed {
                        token: load.token,
                        error: PdfError::EngineUnavailable(message.clone()),
                    }),
                    PdfRequest::Render(render) => reply(PdfReply::RenderFailed {
                        token: render.token,
                        error: PdfError::NoDocument,
                    }),
                    PdfRequest::Activate { .. } => {}
                }
            }
            return;
        }
    };

    // The document the viewer has accepted, and the newest decode it has not
    // confirmed yet. A later load supersedes the unconfirmed one whatever its
    // outcome, so a failed load never disturbs the active document.
    let mut active: Option<(u64, E::Document<'_>)> = None;
    let mut pending: Option<(u64, E::Document<'_>)> = None;
    let mut backlog: VecDeque<PdfRequest> = VecDeque::new();

    loop {
        let Some(request) = backlog.pop_front().or_else(|| requests.blocking_recv()) else {
            break;
        };
        match request {
            PdfRequest::Load(load) => {
                pending = None;
                let decoded =
                    read_bytes(&load.selection.source).and_then(|bytes| engine.decode(bytes));
                match decoded {
                    Ok(document) if engine.page_count(&document) == 0 => {
                        reply(PdfReply::LoadFailed {
                            token: load.token,
                            error: PdfError::Decode("the document has no pages".to_string()),
                        })
                    }
                    Ok(document) => {
                        let page_count = engine.page_count(&document);
                        pending = Some((load.token, document));
                        reply(PdfReply::Loaded {
                            token: load.token,
                            page_count,
                            name: load.selection.name,
                        });
                    }
                    Err(error) => reply(PdfReply::LoadFailed {
                        token: load.token,
                        error,
                    }),
                }
            }
            PdfRequest::Activate { document } => {
                if pending.as_ref().is_some_and(|(token, _)| *token == document) {
                    // The previous document is dropped here.
                    active = pending.take();
                    debug!(document, "Document activated");
                } else {
                    trace!(document, "Activation for a document no longer held");
                }
            }
            PdfRequest::Render(render) => {
                while let Ok(queued) = requests.try_recv() {
                    backlog.push_back(queued);
                }
                if backlog
                    .iter()
                    .any(|queued| matches!(queued, PdfRequest::Render(_)))
                {
                    trace!(token = render.token, "Skipping superseded render");
                    continue;
                }

                let target = active
                    .iter()
                    .chain(pending.iter())
                    .find(|(token, _)| *token == render.document);
                let result = match target {
                    Some((_, document)) => {
                        engine.render_page(document, render.page_number, render.scale)
                    }
                    None if active.is_some() || pending.is_some() => {
                        Err(PdfError::StaleDocument {
                            requested: render.document,
                        })
                    }
                    None => Err(PdfError::NoDocument),
                };
                reply(match result {
                    Ok(bitmap) => PdfReply::Rendered {
                        token: render.token,
                        bitmap,
                    },
                    Err(error) => PdfReply::RenderFailed {
                        token: render.token,
                        error,
                    },
                });
            }
        }
    }
}

fn read_bytes(source: &FileSource) -> Result<Vec<u8>, PdfError> {
    match source {
        FileSource::Path(path) => std::fs::read(path).map_err(|source| PdfError::Read {
            path: path.clone(),
            source,
        }),
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
    }
}
