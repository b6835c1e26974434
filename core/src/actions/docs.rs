api_group! {
    /// `docs.*`: user and community documents.
    Docs => "docs" {
        /// Detailed information about user or community documents.
        get => "get",
        /// Documents by their `owner_id_doc_id` identifiers (`docs` param).
        get_by_id => "getById",
        get_upload_server => "getUploadServer",
        get_wall_upload_server => "getWallUploadServer",
        /// Save a document after uploading it to the upload server.
        save => "save",
        delete => "delete",
        /// Copy a document to the current user's or community's documents.
        add => "add",
        get_types => "getTypes",
        search => "search",
        /// Edit title and tags. Fails with code 1150 / 1152 on a bad id or title.
        edit => "edit",
    }
}
