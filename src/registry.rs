//! Static registry mapping configured document-type codes to transfer operations.
//!
//! The remote platform's own type system is the source of truth; this table
//! exists to fail fast on a typo'd configuration value before spending a
//! network round trip. Unknown codes resolve to `None` and the caller maps
//! that to a typed failure. Adding a document type is a one-line edit here.

/// Which side of the transfer a configured code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Download,
    Upload,
}

/// Report kinds the platform can generate for download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    FlatFileActionableOrderDataShipping,
    FlatFileAllOrdersDataByOrderDateGeneral,
    FlatFileOrderReportDataShipping,
    AmazonFulfilledShipmentsDataGeneral,
    FlatFileReturnsDataByReturnDate,
    ReferralFeePreviewReport,
}

/// Feed kinds the platform accepts for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedType {
    FlatFilePriceAndQuantityOnlyUpdateData,
    FlatFileFulfillmentData,
    FlatFileInvLoaderData,
}

/// A resolved transfer operation for one configured document-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    DownloadReport(ReportType),
    UploadFeed(FeedType),
}

const REPORT_TYPES: &[(&str, ReportType)] = &[
    (
        "GET_FLAT_FILE_ACTIONABLE_ORDER_DATA_SHIPPING",
        ReportType::FlatFileActionableOrderDataShipping,
    ),
    (
        "GET_FLAT_FILE_ALL_ORDERS_DATA_BY_ORDER_DATE_GENERAL",
        ReportType::FlatFileAllOrdersDataByOrderDateGeneral,
    ),
    (
        "GET_FLAT_FILE_ORDER_REPORT_DATA_SHIPPING",
        ReportType::FlatFileOrderReportDataShipping,
    ),
    (
        "GET_AMAZON_FULFILLED_SHIPMENTS_DATA_GENERAL",
        ReportType::AmazonFulfilledShipmentsDataGeneral,
    ),
    (
        "GET_FLAT_FILE_RETURNS_DATA_BY_RETURN_DATE",
        ReportType::FlatFileReturnsDataByReturnDate,
    ),
    (
        "GET_REFERRAL_FEE_PREVIEW_REPORT",
        ReportType::ReferralFeePreviewReport,
    ),
];

const FEED_TYPES: &[(&str, FeedType)] = &[
    (
        "POST_FLAT_FILE_PRICEANDQUANTITYONLY_UPDATE_DATA",
        FeedType::FlatFilePriceAndQuantityOnlyUpdateData,
    ),
    (
        "POST_FLAT_FILE_FULFILLMENT_DATA",
        FeedType::FlatFileFulfillmentData,
    ),
    ("POST_FLAT_FILE_INVLOADER_DATA", FeedType::FlatFileInvLoaderData),
];

impl ReportType {
    /// The wire code the platform expects for this report kind.
    pub fn code(&self) -> &'static str {
        REPORT_TYPES
            .iter()
            .find(|(_, t)| t == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }
}

impl FeedType {
    /// The wire code the platform expects for this feed kind.
    pub fn code(&self) -> &'static str {
        FEED_TYPES
            .iter()
            .find(|(_, t)| t == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }
}

/// Resolve a configured document-type code to its transfer operation.
///
/// Pure, stateless lookup against the fixed allow-list above. Unknown codes
/// return `None` and never panic.
pub fn resolve(code: &str, direction: Direction) -> Option<OperationKind> {
    match direction {
        Direction::Download => REPORT_TYPES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| OperationKind::DownloadReport(*t)),
        Direction::Upload => FEED_TYPES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| OperationKind::UploadFeed(*t)),
    }
}
