api_group! {
    /// `newsfeed.*`
    Newsfeed => "newsfeed" {
        get => "get",
        get_recommended => "getRecommended",
        get_comments => "getComments",
        get_mentions => "getMentions",
        get_banned => "getBanned",
        add_ban => "addBan",
        delete_ban => "deleteBan",
        /// Hide an item; `type` takes a [`NewsfeedItemType`](super::enums::NewsfeedItemType).
        ignore_item => "ignoreItem",
        unignore_item => "unignoreItem",
        search => "search",
        get_lists => "getLists",
        save_list => "saveList",
        delete_list => "deleteList",
        unsubscribe => "unsubscribe",
        get_suggested_sources => "getSuggestedSources",
    }
}
