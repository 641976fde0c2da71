macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod books {
        /// `GET` lists, `POST` creates, `DELETE` removes (id in body).
        pub const COLLECTION: &str = v1_path!("/book");
        /// `GET` fetches, `POST` edits.
        pub const ITEM: &str = v1_path!("/book/{bookid}");
    }

    pub mod notes {
        /// `GET ?bookid=` lists a book's notes, `POST` creates, `DELETE`
        /// removes (id in body).
        pub const COLLECTION: &str = v1_path!("/note");
        /// `GET` fetches, `POST` edits.
        pub const ITEM: &str = v1_path!("/note/{noteid}");
    }
}

/// Routes served outside the versioned prefix.
pub mod ops {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}

pub mod utils {
    /// Substitute `{name}` placeholders in a route template.
    pub fn replace_param(template: &str, name: &str, value: impl AsRef<str>) -> String {
        template.replace(&format!("{{{name}}}"), value.as_ref())
    }
}
