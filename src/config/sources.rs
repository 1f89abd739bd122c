// src/config/sources.rs
//
// Static provider families: which provider-asset pairs exist, how each one
// publishes, and the per-provider cycle codes and request headers.

use std::fmt;
use std::str::FromStr;

use super::consts::{BODY_START_LINE, FOOTER_SENTINEL};
use crate::engine::fixed_width::FixedLayout;
use crate::engine::normalize::Schema;
use crate::model::{Cycle, CycleCodes, SourceDescriptor, SourceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    EnergyTransfer,
    Enable,
    Williams,
    OneLine,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::EnergyTransfer,
        ProviderKind::Enable,
        ProviderKind::Williams,
        ProviderKind::OneLine,
    ];

    /// Command-line name, also the output sub-directory and file prefix.
    pub fn key(self) -> &'static str {
        match self {
            ProviderKind::EnergyTransfer => "energy-transfer",
            ProviderKind::Enable => "enable",
            ProviderKind::Williams => "williams",
            ProviderKind::OneLine => "one-line",
        }
    }

    pub fn provider(self) -> &'static Provider {
        match self {
            ProviderKind::EnergyTransfer => &ENERGY_TRANSFER,
            ProviderKind::Enable => &ENABLE,
            ProviderKind::Williams => &WILLIAMS,
            ProviderKind::OneLine => &ONE_LINE,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "energytransfer" | "et" => Ok(ProviderKind::EnergyTransfer),
            "enable" => Ok(ProviderKind::Enable),
            "williams" => Ok(ProviderKind::Williams),
            "oneline" | "1line" => Ok(ProviderKind::OneLine),
            _ => Err(format!("Unknown provider: {s}")),
        }
    }
}

/// One provider family: its sources in scrape order plus everything shared by them.
#[derive(Debug)]
pub struct Provider {
    pub kind: ProviderKind,
    pub sources: &'static [SourceDescriptor],
    pub cycles: CycleCodes,
    pub schema: Schema,
    pub get_headers: &'static [(&'static str, &'static str)],
    pub post_headers: &'static [(&'static str, &'static str)],
    /// Present for providers that publish fixed-width text.
    pub layout: Option<FixedLayout<'static>>,
}

impl Provider {
    /// Numeric cycle code sent upstream; `None` if this provider never publishes `cycle`.
    pub fn cycle_code(&self, cycle: Cycle) -> Option<u8> {
        self.cycles.code(cycle)
    }
}

/* ---------------- Header tables ---------------- */

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

pub const BROWSER_GET: &[(&str, &str)] = &[
    ("Accept", ACCEPT_HTML),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Cache-Control", "max-age=0"),
    ("Connection", "keep-alive"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "same-origin"),
    ("Sec-Fetch-User", "?1"),
    ("Upgrade-Insecure-Requests", "1"),
];

pub const BROWSER_POST: &[(&str, &str)] = &[
    ("Accept", ACCEPT_HTML),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Cache-Control", "max-age=0"),
    ("Connection", "keep-alive"),
    ("Content-Type", "application/x-www-form-urlencoded"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "same-origin"),
    ("Sec-Fetch-User", "?1"),
    ("Upgrade-Insecure-Requests", "1"),
];

/* ---------------- Energy Transfer ---------------- */

const ET_DOWNLOAD: &str = "https://feptransfer.energytransfer.com/ipost/capacity/operationally-available";

pub static ENERGY_TRANSFER: Provider = Provider {
    kind: ProviderKind::EnergyTransfer,
    sources: &[
        SourceDescriptor {
            provider_id: "829416002",
            asset_id: "FEP",
            name: "Fayetteville Express Pipeline, LLC",
            site: "feptransfer.energytransfer",
            kind: SourceKind::CsvDownload {
                download_url: ET_DOWNLOAD,
                post_url: "https://feptransfer.energytransfer.com/ipost/FEP/capacity/operationally-available",
            },
        },
        SourceDescriptor {
            provider_id: "007933047",
            asset_id: "TW",
            name: "Transwestern Pipeline Company, LLC",
            site: "feptransfer.energytransfer",
            kind: SourceKind::CsvDownload {
                download_url: ET_DOWNLOAD,
                post_url: "https://feptransfer.energytransfer.com/ipost/TW/capacity/operationally-available",
            },
        },
        SourceDescriptor {
            provider_id: "829521983",
            asset_id: "TGR",
            name: "ETC Tiger Pipeline, LLC",
            site: "feptransfer.energytransfer",
            kind: SourceKind::CsvDownload {
                download_url: ET_DOWNLOAD,
                post_url: "https://feptransfer.energytransfer.com/ipost/TGR/capacity/operationally-available",
            },
        },
    ],
    cycles: CycleCodes(&[
        (Cycle::Timely, 0),
        (Cycle::Evening, 1),
        (Cycle::Intraday1, 3),
        (Cycle::Intraday2, 4),
        (Cycle::Intraday3, 7),
        (Cycle::Final, 5),
    ]),
    schema: Schema::Delimited,
    get_headers: BROWSER_GET,
    post_headers: BROWSER_POST,
    layout: None,
};

/* ---------------- Enable (Energy Transfer fixed-width postings) ---------------- */

pub const ENABLE_OFFSETS: [usize; 13] = [0, 8, 34, 39, 59, 65, 73, 87, 99, 111, 125, 145, 153];

pub const ENABLE_COLUMNS: [&str; 12] = [
    "Loc",
    "Location Name",
    "Loc Zone",
    "Loc Purpose",
    "Loc/QTI",
    "All Qty Avail",
    "Design Capacity",
    "Operating Capacity",
    "Total Scheduled Quantity",
    "Operationally Available Capacity",
    "Flow Ind Desc",
    "IT Desc",
];

pub const ENABLE_LAYOUT: FixedLayout<'static> = FixedLayout {
    offsets: &ENABLE_OFFSETS,
    columns: &ENABLE_COLUMNS,
    sentinel: FOOTER_SENTINEL,
    body_start: BODY_START_LINE,
};

const ENABLE_API: &str = "https://pipelines.energytransfer.com";

pub static ENABLE: Provider = Provider {
    kind: ProviderKind::Enable,
    sources: &[
        SourceDescriptor {
            provider_id: "872670161",
            asset_id: "EGT",
            name: "ENABLE GAS TRANSMISSION, LLC",
            site: "pipelines.energytransfer",
            kind: SourceKind::Listing {
                api_url: ENABLE_API,
                listing_url: "https://pipelines.energytransfer.com/ipost/EGT/capacity/enbl-operationally-available?max=ALL",
            },
        },
        SourceDescriptor {
            provider_id: "006968077",
            asset_id: "MRT",
            name: "ENABLE MISSISSIPPI RIVER TRANSMISSION, LLC",
            site: "pipelines.energytransfer",
            kind: SourceKind::Listing {
                api_url: ENABLE_API,
                listing_url: "https://pipelines.energytransfer.com/ipost/MRT/capacity/enbl-operationally-available?max=ALL",
            },
        },
    ],
    // postings are chosen by title, codes are only informational
    cycles: CycleCodes(&[
        (Cycle::Timely, 0),
        (Cycle::Evening, 1),
        (Cycle::Intraday1, 2),
        (Cycle::Intraday2, 3),
        (Cycle::Intraday3, 4),
        (Cycle::Final, 5),
    ]),
    schema: Schema::FixedWidth,
    get_headers: BROWSER_GET,
    post_headers: BROWSER_POST,
    layout: Some(ENABLE_LAYOUT),
};

/* ---------------- Williams (HTML detail pages) ---------------- */

pub const WILLIAMS_BASIS: &str = "MMBTU";

pub static WILLIAMS: Provider = Provider {
    kind: ProviderKind::Williams,
    sources: &[
        SourceDescriptor {
            provider_id: "",
            asset_id: "DISCOVERY",
            name: "Discovery Gas Transmission LLC",
            site: "discovery.williams",
            kind: SourceKind::HtmlTable { download_url: "https://discovery.williams.com/oa_detail.jsp" },
        },
        SourceDescriptor {
            provider_id: "",
            asset_id: "BLACKMARLIN",
            name: "Black Marlin Pipeline Company",
            site: "blackmarlin.williams",
            kind: SourceKind::HtmlTable { download_url: "https://blackmarlin.williams.com/oa_detail.jsp" },
        },
    ],
    cycles: CycleCodes(&[
        (Cycle::Timely, 1),
        (Cycle::Evening, 2),
        (Cycle::Intraday1, 3),
        (Cycle::Intraday2, 4),
        (Cycle::Intraday3, 5),
    ]),
    schema: Schema::Delimited,
    get_headers: BROWSER_GET,
    post_headers: BROWSER_POST,
    layout: None,
};

/* ---------------- 1Line (Williams-operated query + CSV) ---------------- */

pub static ONE_LINE: Provider = Provider {
    kind: ProviderKind::OneLine,
    sources: &[
        SourceDescriptor {
            provider_id: "",
            asset_id: "PINENEEDLE",
            name: "Pine Needle LNG Company, LLC",
            site: "pineneedle.williams",
            kind: SourceKind::CsvQuery {
                query_url: "https://www.pineneedle.williams.com/ebbCode/OACQueryRequest.jsp?BUID=82&type=OAC",
                report_url: "https://www.pineneedle.williams.com/ebbCode/OACreport.jsp",
                download_url: "https://www.pineneedle.williams.com/ebbCode/OACreportCSV.jsp",
                bu_id: 82,
            },
        },
        SourceDescriptor {
            provider_id: "",
            asset_id: "TRANSCO",
            name: "Transcontinental Gas Pipe Line Company, LLC",
            site: "1line.williams",
            kind: SourceKind::CsvQuery {
                query_url: "https://www.1line.williams.com/ebbCode/OACQueryRequest.jsp?BUID=80&type=OAC",
                report_url: "https://www.1line.williams.com/ebbCode/OACreport.jsp",
                download_url: "https://www.1line.williams.com/ebbCode/OACreportCSV.jsp",
                bu_id: 80,
            },
        },
        SourceDescriptor {
            provider_id: "",
            asset_id: "GULFSTREAM",
            name: "Gulfstream Natural Gas System, L.L.C.",
            site: "1line.gulfstreamgas",
            kind: SourceKind::CsvQuery {
                query_url: "https://www.1line.gulfstreamgas.com/ebbCode/OACQueryRequest.jsp?BUID=205&type=OAC",
                report_url: "https://www.1line.gulfstreamgas.com/ebbCode/OACreport.jsp",
                download_url: "https://www.1line.gulfstreamgas.com/ebbCode/OACreportCSV.jsp",
                bu_id: 205,
            },
        },
    ],
    cycles: CycleCodes(&[
        (Cycle::Timely, 1),
        (Cycle::Evening, 2),
        (Cycle::Intraday1, 3),
        (Cycle::Intraday2, 4),
        (Cycle::Intraday3, 8),
    ]),
    schema: Schema::Published,
    get_headers: BROWSER_GET,
    post_headers: BROWSER_POST,
    layout: None,
};
