//! Well-known CMIS property ids.

/// Object id.
pub const OBJECT_ID: &str = "cmis:objectId";
/// Object type id; selects the type at creation time.
pub const OBJECT_TYPE_ID: &str = "cmis:objectTypeId";
/// Base type id.
pub const BASE_TYPE_ID: &str = "cmis:baseTypeId";
/// Object name.
pub const NAME: &str = "cmis:name";
/// User who created the object.
pub const CREATED_BY: &str = "cmis:createdBy";
/// Creation timestamp.
pub const CREATION_DATE: &str = "cmis:creationDate";
/// User who last modified the object.
pub const LAST_MODIFIED_BY: &str = "cmis:lastModifiedBy";
/// Last modification timestamp.
pub const LAST_MODIFICATION_DATE: &str = "cmis:lastModificationDate";

/// Folder path (folders only).
pub const PATH: &str = "cmis:path";
/// Parent folder id (folders only).
pub const PARENT_ID: &str = "cmis:parentId";

/// Whether this is the latest version (documents only).
pub const IS_LATEST_VERSION: &str = "cmis:isLatestVersion";
/// Version label (documents only).
pub const VERSION_LABEL: &str = "cmis:versionLabel";
/// Whether the version series is checked out (documents only).
pub const IS_VERSION_SERIES_CHECKED_OUT: &str = "cmis:isVersionSeriesCheckedOut";
/// Comment attached at check-in (documents only).
pub const CHECKIN_COMMENT: &str = "cmis:checkinComment";
/// Content stream length in bytes (documents only).
pub const CONTENT_STREAM_LENGTH: &str = "cmis:contentStreamLength";
/// Content stream MIME type (documents only).
pub const CONTENT_STREAM_MIME_TYPE: &str = "cmis:contentStreamMimeType";
/// Content stream file name (documents only).
pub const CONTENT_STREAM_FILE_NAME: &str = "cmis:contentStreamFileName";
