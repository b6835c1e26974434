api_group! {
    /// `pages.*`: wiki pages of communities and applications.
    Pages => "pages" {
        get => "get",
        save => "save",
        /// `view` / `edit` take a [`PageAccess`](super::enums::PageAccess).
        save_access => "saveAccess",
        get_history => "getHistory",
        get_titles => "getTitles",
        get_version => "getVersion",
        parse_wiki => "parseWiki",
        clear_cache => "clearCache",
    }
}
