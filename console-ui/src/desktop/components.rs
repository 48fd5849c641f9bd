pub mod document_list;
pub mod status_views;
pub mod workspace_canvas;
