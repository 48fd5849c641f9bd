use std::rc::Rc;

use dioxus::prelude::{spawn, Signal, WritableExt};
use dioxus_logger::tracing::{debug, error, warn};
use gloo_timers::future::TimeoutFuture;
use shared_types::FileDescriptor;

use crate::api::MayanClient;
use crate::desktop::shortcuts::Shortcut;
use crate::desktop::state::{LoadRequest, PreviewWindowManager, Settlement, ShortcutOutcome, WindowId};
use crate::desktop_window::WindowAction;
use crate::interop::BrowserObjectUrls;
use crate::viewers::source::{download, resolve, PreviewBackend};

const DOWNLOAD_NOTICE_MS: u32 = 4_000;

/// Resolve a load and hand the outcome back to the manager. Stale or
/// orphaned outcomes are released by the manager.
pub async fn run_load(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    request: LoadRequest,
) {
    let urls = BrowserObjectUrls;
    let outcome = resolve(
        &client,
        &urls,
        request.document_id,
        &request.descriptor,
        request.category,
    )
    .await;
    let settlement = manager.write().settle(request.ticket, outcome, &urls);
    if settlement != Settlement::Applied {
        debug!(
            "load for window {} ended {:?}",
            request.ticket.window_id, settlement
        );
    }
}

pub fn open_preview(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    document_id: u64,
    descriptor: FileDescriptor,
) {
    let request = manager.write().open(document_id, Rc::new(descriptor));
    spawn(run_load(client, manager, request));
}

/// Re-read the file metadata and load it again. The ticket is taken before
/// the metadata request so the last reload started is the one that lands.
pub async fn reload_preview(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    id: WindowId,
) {
    let Some(pending) = manager.write().begin_reload(id, &BrowserObjectUrls) else {
        return;
    };

    let descriptor = match client
        .fetch_file_metadata(pending.document_id, pending.descriptor.id)
        .await
    {
        Ok(fresh) => Rc::new(fresh),
        Err(e) => {
            warn!("could not refresh metadata for file {}: {e}", pending.descriptor.id);
            pending.descriptor.clone()
        }
    };

    let request = manager.write().refresh_descriptor(pending.ticket, descriptor);
    match request {
        Some(request) => run_load(client, manager, request).await,
        None => debug!("reload for window {id} superseded"),
    }
}

pub async fn download_preview(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    id: WindowId,
) {
    let Some((document_id, descriptor)) = manager.write().begin_download(id) else {
        debug!("download already running for window {id}");
        return;
    };

    let result = download(&client, &BrowserObjectUrls, document_id, &descriptor).await;
    let failed = result.is_err();
    manager.write().finish_download(
        id,
        result.map_err(|e| {
            error!("download of {} failed: {e}", descriptor.filename);
            e.to_string()
        }),
    );

    if failed {
        TimeoutFuture::new(DOWNLOAD_NOTICE_MS).await;
        manager.write().dismiss_download_notice(id);
    }
}

pub fn close_preview(mut manager: Signal<PreviewWindowManager>, id: WindowId) {
    manager.write().close(id, &BrowserObjectUrls);
}

pub fn apply_window_action(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    id: WindowId,
    action: WindowAction,
) {
    match action {
        WindowAction::Focus => {
            manager.write().focus(id);
        }
        WindowAction::Close => close_preview(manager, id),
        WindowAction::ToggleMinimize => manager.write().toggle_minimize(id),
        WindowAction::ToggleMaximize => manager.write().toggle_maximize(id),
        WindowAction::ZoomIn => {
            manager.write().zoom_in(id);
        }
        WindowAction::ZoomOut => {
            manager.write().zoom_out(id);
        }
        WindowAction::Rotate => {
            manager.write().rotate(id);
        }
        WindowAction::Download => {
            spawn(download_preview(client, manager, id));
        }
        WindowAction::Reload => {
            spawn(reload_preview(client, manager, id));
        }
        WindowAction::BeginDrag { pointer_id, point } => {
            manager.write().begin_drag(id, pointer_id, point);
        }
        WindowAction::BeginResize { pointer_id, point } => {
            manager.write().begin_resize(id, pointer_id, point);
        }
        WindowAction::PointerMove { pointer_id, point } => {
            manager.write().pointer_moved(id, pointer_id, point);
        }
        WindowAction::PointerUp { pointer_id } => {
            manager.write().pointer_released(id, pointer_id);
        }
    }
}

/// Returns true when the key press was consumed.
pub fn apply_shortcut(
    client: MayanClient,
    mut manager: Signal<PreviewWindowManager>,
    shortcut: Shortcut,
) -> bool {
    let outcome = manager.write().handle_shortcut(shortcut);
    match outcome {
        ShortcutOutcome::Discarded => false,
        ShortcutOutcome::Handled(_) => true,
        ShortcutOutcome::Download(id) => {
            spawn(download_preview(client, manager, id));
            true
        }
        ShortcutOutcome::Close(id) => {
            close_preview(manager, id);
            true
        }
    }
}
