//! Endpoint catalogue.
//!
//! One static table describes every supported endpoint: its wire name, the
//! filter parameters it accepts, defaults applied when a parameter is unset,
//! and the commonly requested fields. A single generic call path consumes it.

use std::fmt;
use std::str::FromStr;

use crate::{
    error::{Result, TushareError},
    params::Params,
};

/// Static description of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Wire name sent as `api_name`.
    pub name: &'static str,
    /// Filter parameters the endpoint accepts.
    pub params: &'static [&'static str],
    /// Values applied when the caller leaves a parameter unset.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Commonly requested fields.
    pub common_fields: &'static [&'static str],
}

const BAR_PARAMS: &[&str] = &["ts_code", "trade_date", "start_date", "end_date"];
const BAR_FIELDS: &[&str] = &[
    "ts_code",
    "trade_date",
    "open",
    "high",
    "low",
    "close",
    "pre_close",
    "change",
    "pct_chg",
    "vol",
    "amount",
];
const STATEMENT_PARAMS: &[&str] = &[
    "ts_code",
    "ann_date",
    "start_date",
    "end_date",
    "period",
    "report_type",
    "comp_type",
];

/// Supported Tushare endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Listed securities (`stock_basic`).
    StockBasic,
    /// Exchange trading calendar (`trade_cal`).
    TradeCal,
    /// Listed company profiles (`stock_company`).
    StockCompany,
    /// Stock Connect constituents (`hs_const`).
    HsConst,
    /// Security name history (`namechange`).
    NameChange,
    /// IPO listings (`new_share`).
    NewShare,
    /// Adjustment factors (`adj_factor`).
    AdjFactor,
    /// Income statements (`income`).
    Income,
    /// Balance sheets (`balancesheet`).
    BalanceSheet,
    /// Minute bars (`stk_mins`).
    StockMinutes,
    /// Stock daily bars (`daily`).
    Daily,
    /// Stock weekly bars (`weekly`).
    Weekly,
    /// Stock monthly bars (`monthly`).
    Monthly,
    /// Index daily bars (`index_daily`).
    IndexDaily,
    /// Index weekly bars (`index_weekly`).
    IndexWeekly,
    /// Index monthly bars (`index_monthly`).
    IndexMonthly,
    /// Futures daily bars (`fut_daily`).
    FutDaily,
    /// Digital currency bars (`coinbar`).
    CoinBar,
}

impl Endpoint {
    /// Every endpoint in the catalogue.
    pub const ALL: &'static [Self] = &[
        Self::StockBasic,
        Self::TradeCal,
        Self::StockCompany,
        Self::HsConst,
        Self::NameChange,
        Self::NewShare,
        Self::AdjFactor,
        Self::Income,
        Self::BalanceSheet,
        Self::StockMinutes,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::IndexDaily,
        Self::IndexWeekly,
        Self::IndexMonthly,
        Self::FutDaily,
        Self::CoinBar,
    ];

    /// Returns the static description of this endpoint.
    #[must_use]
    pub const fn spec(self) -> &'static EndpointSpec {
        match self {
            Self::StockBasic => &EndpointSpec {
                name: "stock_basic",
                params: &["is_hs", "list_status", "exchange", "market"],
                defaults: &[("list_status", "L")],
                common_fields: &[
                    "ts_code", "symbol", "name", "area", "industry", "market", "list_date",
                ],
            },
            Self::TradeCal => &EndpointSpec {
                name: "trade_cal",
                params: &["exchange", "start_date", "end_date", "is_open"],
                defaults: &[("exchange", "SSE")],
                common_fields: &["exchange", "cal_date", "is_open", "pretrade_date"],
            },
            Self::StockCompany => &EndpointSpec {
                name: "stock_company",
                params: &["ts_code", "exchange"],
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "exchange",
                    "chairman",
                    "manager",
                    "secretary",
                    "province",
                    "city",
                    "website",
                    "email",
                    "main_business",
                ],
            },
            Self::HsConst => &EndpointSpec {
                name: "hs_const",
                params: &["hs_type", "is_new"],
                defaults: &[("is_new", "1")],
                common_fields: &["ts_code", "hs_type", "in_date", "out_date", "is_new"],
            },
            Self::NameChange => &EndpointSpec {
                name: "namechange",
                params: &["ts_code", "start_date", "end_date"],
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "name",
                    "start_date",
                    "end_date",
                    "ann_date",
                    "change_reason",
                ],
            },
            Self::NewShare => &EndpointSpec {
                name: "new_share",
                params: &["start_date", "end_date"],
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "sub_code",
                    "name",
                    "ipo_date",
                    "issue_date",
                    "price",
                    "pe",
                    "funds",
                    "ballot",
                ],
            },
            Self::AdjFactor => &EndpointSpec {
                name: "adj_factor",
                params: &["ts_code", "trade_date", "start_date", "end_date"],
                defaults: &[],
                common_fields: &["ts_code", "trade_date", "adj_factor"],
            },
            Self::Income => &EndpointSpec {
                name: "income",
                params: STATEMENT_PARAMS,
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "end_date",
                    "ann_date",
                    "total_revenue",
                    "operate_profit",
                    "total_profit",
                    "n_income",
                    "n_income_attr_p",
                    "basic_eps",
                    "diluted_eps",
                ],
            },
            Self::BalanceSheet => &EndpointSpec {
                name: "balancesheet",
                params: STATEMENT_PARAMS,
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "end_date",
                    "ann_date",
                    "total_assets",
                    "total_liab",
                    "total_hldr_eqy_inc_min_int",
                    "total_cur_assets",
                    "total_non_cur_assets",
                    "total_cur_liab",
                    "total_non_cur_liab",
                ],
            },
            Self::StockMinutes => &EndpointSpec {
                name: "stk_mins",
                params: &[
                    "ts_code",
                    "trade_date",
                    "start_date",
                    "end_date",
                    "start_time",
                    "end_time",
                    "freq",
                ],
                defaults: &[("freq", "1")],
                common_fields: &[
                    "ts_code",
                    "trade_time",
                    "open",
                    "high",
                    "low",
                    "close",
                    "vol",
                    "amount",
                ],
            },
            Self::Daily => &EndpointSpec {
                name: "daily",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::Weekly => &EndpointSpec {
                name: "weekly",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::Monthly => &EndpointSpec {
                name: "monthly",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::IndexDaily => &EndpointSpec {
                name: "index_daily",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::IndexWeekly => &EndpointSpec {
                name: "index_weekly",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::IndexMonthly => &EndpointSpec {
                name: "index_monthly",
                params: BAR_PARAMS,
                defaults: &[],
                common_fields: BAR_FIELDS,
            },
            Self::FutDaily => &EndpointSpec {
                name: "fut_daily",
                params: &["ts_code", "trade_date", "exchange", "start_date", "end_date"],
                defaults: &[],
                common_fields: &[
                    "ts_code",
                    "trade_date",
                    "pre_close",
                    "pre_settle",
                    "open",
                    "high",
                    "low",
                    "close",
                    "settle",
                    "vol",
                    "amount",
                    "oi",
                ],
            },
            Self::CoinBar => &EndpointSpec {
                name: "coinbar",
                params: &[
                    "symbol",
                    "exchange",
                    "freq",
                    "start_date",
                    "end_date",
                    "contract_type",
                ],
                defaults: &[],
                common_fields: &[
                    "exchange",
                    "symbol",
                    "freq",
                    "trade_time",
                    "open",
                    "close",
                    "high",
                    "low",
                    "vol",
                ],
            },
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Returns the commonly requested fields as owned strings.
    #[must_use]
    pub fn common_fields(self) -> Vec<String> {
        self.spec()
            .common_fields
            .iter()
            .map(|f| (*f).to_string())
            .collect()
    }

    /// Validates `params` against this endpoint and fills in defaults.
    ///
    /// Fails with [`TushareError::InvalidParameter`] on a parameter the
    /// endpoint does not accept.
    pub fn prepare(self, mut params: Params) -> Result<Params> {
        let spec = self.spec();

        if let Some(unknown) = params.keys().find(|k| !spec.params.contains(k)) {
            return Err(TushareError::InvalidParameter(format!(
                "{} does not accept parameter {unknown}. Supported: {}",
                spec.name,
                spec.params.join(", ")
            )));
        }

        for (key, value) in spec.defaults {
            if !params.contains(key) {
                params.set(*key, *value);
            }
        }

        Ok(params)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = TushareError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| TushareError::InvalidParameter(format!("unknown endpoint: {s}")))
    }
}
