api_group! {
    /// `friends.*`: friend lists and friend requests.
    Friends => "friends" {
        /// Friend ids, or profiles when `fields` is set.
        get => "get",
        get_online => "getOnline",
        get_mutual => "getMutual",
        get_recent => "getRecent",
        get_requests => "getRequests",
        /// Approve a request or send one (`user_id`, optional `text`).
        add => "add",
        edit => "edit",
        delete => "delete",
        get_lists => "getLists",
        add_list => "addList",
        edit_list => "editList",
        delete_list => "deleteList",
        get_app_users => "getAppUsers",
        get_by_phones => "getByPhones",
        delete_all_requests => "deleteAllRequests",
        get_suggestions => "getSuggestions",
        are_friends => "areFriends",
        get_available_for_call => "getAvailableForCall",
        search => "search",
    }
}
