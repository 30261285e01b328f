const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Where an uploaded file is published.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Rom,
}

impl AssetKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let is_image = file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_image {
            AssetKind::Image
        } else {
            AssetKind::Rom
        }
    }

    pub fn directory(&self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::Rom => "roms",
        }
    }
}

/// Lowercases the name and replaces every run of characters outside
/// `[a-z0-9.]` with a single `-`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let mut sanitized = String::with_capacity(file_name.len());
    let mut in_run = false;
    for c in file_name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' {
            sanitized.push(c);
            in_run = false;
        } else if !in_run {
            sanitized.push('-');
            in_run = true;
        }
    }
    sanitized
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteResource {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}
