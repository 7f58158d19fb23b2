//! Shake Around (beacon) service.
//!
//! Wraps the device, page, material, shake-info and statistics endpoints.
//! Every method returns the decoded JSON body unchanged.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::http::*;
use crate::types::DeviceIdentifier;

/// Request body for bindpage.
#[derive(Debug, Serialize)]
struct BindPageRequest<'a> {
    device_identifier: &'a DeviceIdentifier,
    page_ids: &'a [u64],
    bind: u8,
    append: u8,
}

/// Request body for applyid.
#[derive(Debug, Serialize)]
struct ApplyDevicesRequest<'a> {
    quantity: u32,
    apply_reason: &'a str,
    comment: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    poi_id: Option<u64>,
}

/// Request body for device update.
#[derive(Debug, Serialize)]
struct UpdateDeviceRequest<'a> {
    device_identifier: &'a DeviceIdentifier,
    comment: &'a str,
}

/// Request body for bindlocation.
#[derive(Debug, Serialize)]
struct BindLocationRequest<'a> {
    device_identifier: &'a DeviceIdentifier,
    poi_id: u64,
}

/// Request body for device search by identifier.
#[derive(Debug, Serialize)]
struct SearchDeviceRequest<'a> {
    device_identifiers: [&'a DeviceIdentifier; 1],
}

/// Request body for device search by range.
#[derive(Debug, Serialize)]
struct SearchDevicesRequest {
    begin: u32,
    count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    apply_id: Option<u64>,
}

/// Request body for page add and update.
#[derive(Debug, Serialize)]
struct PageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    page_id: Option<u64>,
    title: &'a str,
    description: &'a str,
    page_url: &'a str,
    icon_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

/// Request body for page search and delete by ids.
#[derive(Debug, Serialize)]
struct PageIdsRequest<'a> {
    page_ids: &'a [u64],
}

/// Request body for page search by range.
#[derive(Debug, Serialize)]
struct PageRangeRequest {
    begin: u32,
    count: u32,
}

/// Request body for getshakeinfo.
#[derive(Debug, Serialize)]
struct ShakeInfoRequest<'a> {
    ticket: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    need_poi: Option<u8>,
}

/// Request body for device statistics.
#[derive(Debug, Serialize)]
struct DeviceStatisticsRequest<'a> {
    device_identifier: &'a DeviceIdentifier,
    begin_date: i64,
    end_date: i64,
}

/// Request body for page statistics.
#[derive(Debug, Serialize)]
struct PageStatisticsRequest {
    page_id: u64,
    begin_date: i64,
    end_date: i64,
}

/// The Shake Around service.
///
/// Obtain one from [`ServiceFactory`](crate::ServiceFactory). Devices are
/// addressed with a [`DeviceIdentifier`], which is either the platform's
/// device id or the iBeacon triple.
///
/// # Example
///
/// ```no_run
/// use wxkit::{Credentials, DeviceIdentifier, ServiceFactory};
///
/// # async fn example() -> Result<(), wxkit::Error> {
/// let factory = ServiceFactory::new(Credentials::new("wxappid", "secret")?);
/// let shake = factory.shake().await?;
///
/// let device = DeviceIdentifier::from_parts(Some(10100), None, None, None)?;
/// shake.bind_page(&device, &[28840], true, false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShakeService {
    dispatcher: Dispatcher,
}

impl ShakeService {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher, for endpoints this service does not wrap.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Get the list of IP addresses the platform sends callbacks from.
    pub async fn callback_ips(&self) -> Result<Value> {
        self.dispatcher.callback_ips().await
    }

    // ========================================================================
    // Devices
    // ========================================================================

    /// Bind or unbind pages to a device.
    ///
    /// # Arguments
    ///
    /// * `device` - The device to configure
    /// * `page_ids` - The pages to bind or unbind
    /// * `bind` - `true` to bind, `false` to unbind
    /// * `append` - `true` to add to the existing pages, `false` to replace them
    #[instrument(skip(self), fields(%device))]
    pub async fn bind_page(
        &self,
        device: &DeviceIdentifier,
        page_ids: &[u64],
        bind: bool,
        append: bool,
    ) -> Result<Value> {
        debug!("Binding pages to device");

        let request = BindPageRequest {
            device_identifier: device,
            page_ids,
            bind: u8::from(bind),
            append: u8::from(append),
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_BIND_PAGE).json(&request)?)
            .await
    }

    /// Apply for new device ids.
    ///
    /// # Arguments
    ///
    /// * `quantity` - Number of devices (at most 500)
    /// * `apply_reason` - Reason for the application (at most 100 characters)
    /// * `comment` - Free-form note (at most 15 characters)
    /// * `poi_id` - Location to associate with the devices
    #[instrument(skip(self))]
    pub async fn apply_devices(
        &self,
        quantity: u32,
        apply_reason: &str,
        comment: &str,
        poi_id: Option<u64>,
    ) -> Result<Value> {
        debug!("Applying for devices");

        let request = ApplyDevicesRequest {
            quantity,
            apply_reason,
            comment,
            poi_id,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_APPLY).json(&request)?)
            .await
    }

    /// Edit the comment of a device.
    #[instrument(skip(self), fields(%device))]
    pub async fn update_device(&self, device: &DeviceIdentifier, comment: &str) -> Result<Value> {
        let request = UpdateDeviceRequest {
            device_identifier: device,
            comment,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_UPDATE).json(&request)?)
            .await
    }

    /// Bind a device to a point of interest.
    #[instrument(skip(self), fields(%device))]
    pub async fn bind_location(&self, device: &DeviceIdentifier, poi_id: u64) -> Result<Value> {
        let request = BindLocationRequest {
            device_identifier: device,
            poi_id,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_BIND_LOCATION).json(&request)?)
            .await
    }

    /// Look up a single device.
    #[instrument(skip(self), fields(%device))]
    pub async fn search_device(&self, device: &DeviceIdentifier) -> Result<Value> {
        let request = SearchDeviceRequest {
            device_identifiers: [device],
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_SEARCH).json(&request)?)
            .await
    }

    /// List devices, optionally restricted to one application batch.
    ///
    /// # Arguments
    ///
    /// * `begin` - Index of the first device
    /// * `count` - Number of devices to return
    /// * `apply_id` - The application batch to list
    #[instrument(skip(self))]
    pub async fn search_devices(
        &self,
        begin: u32,
        count: u32,
        apply_id: Option<u64>,
    ) -> Result<Value> {
        let request = SearchDevicesRequest {
            begin,
            count,
            apply_id,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_SEARCH).json(&request)?)
            .await
    }

    /// Upload an image to use as a page icon.
    ///
    /// jpg, jpeg, png or gif; 120x120 px recommended, 200x200 px at most.
    #[instrument(skip(self, image), fields(file_name = image.file_name(), len = image.len()))]
    pub async fn upload_material(&self, image: Media) -> Result<Value> {
        debug!("Uploading page icon");
        self.dispatcher
            .send(ApiRequest::post(SHAKE_MATERIAL_ADD).file("media", image))
            .await
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Create a page.
    ///
    /// # Arguments
    ///
    /// * `title` - Main title (at most 6 characters)
    /// * `description` - Subtitle (at most 7 characters)
    /// * `page_url` - The URL the page opens
    /// * `icon_url` - Icon URL, as returned by [`upload_material`](Self::upload_material)
    /// * `comment` - Free-form note (at most 15 characters)
    #[instrument(skip(self))]
    pub async fn add_page(
        &self,
        title: &str,
        description: &str,
        page_url: &str,
        icon_url: &str,
        comment: Option<&str>,
    ) -> Result<Value> {
        debug!("Adding page");

        let request = PageRequest {
            page_id: None,
            title,
            description,
            page_url,
            icon_url,
            comment,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_ADD).json(&request)?)
            .await
    }

    /// Edit a page. Arguments are as for [`add_page`](Self::add_page).
    #[instrument(skip(self))]
    pub async fn update_page(
        &self,
        page_id: u64,
        title: &str,
        description: &str,
        page_url: &str,
        icon_url: &str,
        comment: Option<&str>,
    ) -> Result<Value> {
        let request = PageRequest {
            page_id: Some(page_id),
            title,
            description,
            page_url,
            icon_url,
            comment,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_UPDATE).json(&request)?)
            .await
    }

    /// Look up pages by id.
    #[instrument(skip(self))]
    pub async fn search_pages_by_ids(&self, page_ids: &[u64]) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_SEARCH).json(&PageIdsRequest { page_ids })?)
            .await
    }

    /// List `count` pages starting at index `begin`.
    #[instrument(skip(self))]
    pub async fn search_pages_by_range(&self, begin: u32, count: u32) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_SEARCH).json(&PageRangeRequest { begin, count })?)
            .await
    }

    /// Delete pages by id.
    #[instrument(skip(self))]
    pub async fn delete_pages(&self, page_ids: &[u64]) -> Result<Value> {
        debug!("Deleting pages");
        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_DELETE).json(&PageIdsRequest { page_ids })?)
            .await
    }

    // ========================================================================
    // Shake events and statistics
    // ========================================================================

    /// Resolve the ticket of a shake event into the device and user details.
    ///
    /// `need_poi` asks for the device's `poi_id` to be included. `Some(false)`
    /// is sent as `"need_poi": 0`; `None` leaves the field out.
    #[instrument(skip(self, ticket))]
    pub async fn shake_info(&self, ticket: &str, need_poi: Option<bool>) -> Result<Value> {
        let request = ShakeInfoRequest {
            ticket,
            need_poi: need_poi.map(u8::from),
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_USER_INFO).json(&request)?)
            .await
    }

    /// Daily statistics of a device between two unix timestamps (at most 30 days apart).
    #[instrument(skip(self), fields(%device))]
    pub async fn device_statistics(
        &self,
        device: &DeviceIdentifier,
        begin_date: i64,
        end_date: i64,
    ) -> Result<Value> {
        let request = DeviceStatisticsRequest {
            device_identifier: device,
            begin_date,
            end_date,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_DEVICE_STATISTICS).json(&request)?)
            .await
    }

    /// Daily statistics of a page between two unix timestamps (at most 30 days apart).
    #[instrument(skip(self))]
    pub async fn page_statistics(&self, page_id: u64, begin_date: i64, end_date: i64) -> Result<Value> {
        let request = PageStatisticsRequest {
            page_id,
            begin_date,
            end_date,
        };

        self.dispatcher
            .send(ApiRequest::post(SHAKE_PAGE_STATISTICS).json(&request)?)
            .await
    }
}
