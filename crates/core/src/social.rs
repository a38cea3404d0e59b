//! Fixed social-media image formats offered by the share tool.

/// One target format: label shown to the user plus output dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialFormat {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: &'static str,
}

/// All formats, in display order. The first entry is the default selection.
pub const SOCIAL_FORMATS: &[SocialFormat] = &[
    SocialFormat {
        label: "Instagram Square (1:1)",
        width: 1080,
        height: 1080,
        aspect_ratio: "1:1",
    },
    SocialFormat {
        label: "Instagram Portrait (4:5)",
        width: 864,
        height: 1080,
        aspect_ratio: "4:5",
    },
    SocialFormat {
        label: "Facebook Cover (208:78)",
        width: 820,
        height: 312,
        aspect_ratio: "205:78",
    },
    SocialFormat {
        label: "Twitter Post (16:9)",
        width: 1200,
        height: 675,
        aspect_ratio: "16:9",
    },
    SocialFormat {
        label: "Twitter Header (3:1)",
        width: 1500,
        height: 500,
        aspect_ratio: "3:1",
    },
];

impl SocialFormat {
    /// Look a format up by its exact label.
    pub fn by_label(label: &str) -> Option<&'static SocialFormat> {
        SOCIAL_FORMATS.iter().find(|f| f.label == label)
    }

    /// The default format.
    pub fn default_format() -> &'static SocialFormat {
        &SOCIAL_FORMATS[0]
    }

    /// Download file name: whitespace becomes `_`, lowercased, `.png` suffix.
    ///
    /// `"Instagram Square (1:1)"` -> `"instagram_square_(1:1).png"`.
    pub fn download_file_name(&self) -> String {
        let stem: String = self
            .label
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("{}.png", stem.to_lowercase())
    }
}
