/// An image received with a submission, held in memory until it is stored
/// and its metadata has been inspected.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
