pub mod admin_delete;
pub mod admin_list;
pub mod admin_upload;
pub mod document_authorize;
pub mod document_content;
pub mod document_describe;
pub mod health;

pub use admin_delete::delete_document;
pub use admin_list::list_documents;
pub use admin_upload::upload_document;
pub use document_authorize::authorize_document;
pub use document_content::fetch_document_content;
pub use document_describe::describe_document;
pub use health::health_check;
