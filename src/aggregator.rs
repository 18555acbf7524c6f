use hourglass_rs::SafeTimeProvider;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::{FailurePolicy, ServiceChargeConfig};
use crate::decimal::Money;
use crate::errors::{Result, ServiceChargeError};
use crate::events::{Event, EventStore};
use crate::period::{ActivePeriod, DateRangeFactory};
use crate::reader::RepaymentReader;
use crate::summary::{LoanBalanceSeries, SummaryBuilder};
use crate::types::{LoanId, LoanProductSnapshot, LoanSnapshot, ProductId, SummaryMode};

/// loan summaries of one computation, keyed by loan id.
///
/// each loan is summarised at most once per cache. a cache belongs to a
/// single computation and is dropped with it.
#[derive(Debug)]
pub struct LoanSummaryCache {
    months: usize,
    summaries: HashMap<LoanId, LoanBalanceSeries>,
    computations: usize,
}

impl LoanSummaryCache {
    pub fn for_period(period: &ActivePeriod) -> Self {
        Self {
            months: period.duration_in_months() as usize,
            summaries: HashMap::new(),
            computations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn contains(&self, loan_id: LoanId) -> bool {
        self.summaries.contains_key(&loan_id)
    }

    pub fn get(&self, loan_id: LoanId) -> Option<&LoanBalanceSeries> {
        self.summaries.get(&loan_id)
    }

    /// number of summaries actually built, as opposed to served from the cache
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// cached summary for the loan, building it on first request
    pub fn get_or_compute<R: RepaymentReader>(
        &mut self,
        builder: &SummaryBuilder<'_, R>,
        loan: &LoanSnapshot,
        product: &LoanProductSnapshot,
        mode: SummaryMode,
    ) -> Result<&LoanBalanceSeries> {
        match self.summaries.entry(loan.id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let series = builder.build(loan, product, mode)?;
                self.computations += 1;
                Ok(entry.insert(series))
            }
        }
    }

    /// all cached summaries ordered by loan id
    pub fn summaries(&self) -> Vec<&LoanBalanceSeries> {
        let mut all: Vec<_> = self.summaries.values().collect();
        all.sort_by_key(|s| s.loan_id());
        all
    }

    pub fn loan_count(&self, is_demand_loan: bool) -> usize {
        self.matching(is_demand_loan).count()
    }

    /// month-wise outstanding summed over loans of the given category
    pub fn aggregate_monthly(&self, is_demand_loan: bool) -> Result<Vec<Money>> {
        self.aggregate(is_demand_loan, LoanBalanceSeries::outstanding)
    }

    /// month-wise repayments summed over loans of the given category
    pub fn aggregate_monthly_repayments(&self, is_demand_loan: bool) -> Result<Vec<Money>> {
        self.aggregate(is_demand_loan, LoanBalanceSeries::repayments)
    }

    fn matching(&self, is_demand_loan: bool) -> impl Iterator<Item = &LoanBalanceSeries> {
        // xnor: both demand or both term
        self.summaries.values().filter(move |s| s.is_demand_loan() == is_demand_loan)
    }

    fn aggregate(&self, is_demand_loan: bool, pick: fn(&LoanBalanceSeries) -> &[Money]) -> Result<Vec<Money>> {
        let mut totals = vec![Money::ZERO; self.months];
        for series in self.matching(is_demand_loan) {
            let values = pick(series);
            if values.len() != totals.len() {
                return Err(ServiceChargeError::InconsistentSeriesLength {
                    loan_id: series.loan_id(),
                    expected: totals.len(),
                    found: values.len(),
                });
            }
            for (total, value) in totals.iter_mut().zip(values) {
                *total += *value;
            }
        }
        Ok(totals)
    }
}

/// a loan that could not be summarised
#[derive(Debug, Clone, PartialEq)]
pub struct LoanFailure {
    pub loan_id: LoanId,
    pub error: ServiceChargeError,
}

/// portfolio-wide inputs of a periodic service charge
#[derive(Debug, Clone)]
pub struct PeriodicChargeComputation {
    pub run_id: Uuid,
    pub period: ActivePeriod,
    pub demand_loan_monthly_series: Vec<Money>,
    pub term_loan_monthly_series: Vec<Money>,
    pub demand_loan_monthly_repayments: Vec<Money>,
    pub term_loan_monthly_repayments: Vec<Money>,
    pub demand_loan_count: usize,
    pub term_loan_count: usize,
    /// current total outstanding of the summarised loans
    pub total_outstanding_amount: Money,
    /// per-loan summaries ordered by loan id
    pub summaries: Vec<LoanBalanceSeries>,
    pub failures: Vec<LoanFailure>,
    pub events: Vec<Event>,
}

impl PeriodicChargeComputation {
    /// distinct loans that contributed to the series
    pub fn total_loans(&self) -> usize {
        self.demand_loan_count + self.term_loan_count
    }

    pub fn demand_loan_total(&self) -> Money {
        self.demand_loan_monthly_series.iter().sum()
    }

    pub fn term_loan_total(&self) -> Money {
        self.term_loan_monthly_series.iter().sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// runs service charge computations under a fixed configuration
pub struct ServiceChargeCalculator {
    config: ServiceChargeConfig,
}

impl ServiceChargeCalculator {
    pub fn new(config: ServiceChargeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceChargeConfig {
        &self.config
    }

    pub fn compute<R: RepaymentReader>(
        &self,
        loans: &[LoanSnapshot],
        products: &[LoanProductSnapshot],
        reader: &R,
        time_provider: &SafeTimeProvider,
    ) -> Result<PeriodicChargeComputation> {
        let run_id = Uuid::new_v4();
        let span = info_span!("service_charge", %run_id);
        let _guard = span.enter();

        let period = DateRangeFactory::resolve(&self.config.period, time_provider)?;
        let mut events = EventStore::new();
        events.emit(Event::PeriodResolved {
            run_id,
            period: period.period,
            year: period.year,
            from_date: period.from_date(),
            to_date: period.to_date(),
        });

        let products: HashMap<ProductId, &LoanProductSnapshot> = products.iter().map(|p| (p.id, p)).collect();
        let builder = SummaryBuilder::new(&period, reader)
            .with_averaging(self.config.averaging_policy, self.config.average_scale);
        let mut cache = LoanSummaryCache::for_period(&period);
        let mut failures = Vec::new();
        let mut failed: HashSet<LoanId> = HashSet::new();
        let mut total_outstanding_amount = Money::ZERO;

        for loan in loans {
            if cache.contains(loan.id) {
                debug!(loan_id = loan.id, "reusing loan summary");
                events.emit(Event::LoanSummaryReused { run_id, loan_id: loan.id });
                continue;
            }
            if failed.contains(&loan.id) {
                debug!(loan_id = loan.id, "loan already failed in this run");
                continue;
            }

            let outcome = match products.get(&loan.product_id) {
                Some(product) => {
                    let mode = self.config.summary_strategy.mode_for(product.category);
                    cache.get_or_compute(&builder, loan, product, mode)
                }
                None => Err(ServiceChargeError::UnknownProduct {
                    loan_id: loan.id,
                    product_id: loan.product_id,
                }),
            };

            match outcome {
                Ok(series) => {
                    events.emit(Event::LoanSummarised {
                        run_id,
                        loan_id: loan.id,
                        mode: series.mode(),
                        total_outstanding: series.total_outstanding(),
                        total_repayments: series.total_repayments(),
                    });
                    total_outstanding_amount += loan.total_outstanding_amount;
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::FailFast => return Err(error),
                    FailurePolicy::CollectErrors => {
                        warn!(loan_id = loan.id, %error, "skipping loan");
                        events.emit(Event::LoanSummaryFailed {
                            run_id,
                            loan_id: loan.id,
                            reason: error.to_string(),
                        });
                        failed.insert(loan.id);
                        failures.push(LoanFailure { loan_id: loan.id, error });
                    }
                },
            }
        }

        let demand_loan_monthly_series = cache.aggregate_monthly(true)?;
        let term_loan_monthly_series = cache.aggregate_monthly(false)?;
        let demand_loan_monthly_repayments = cache.aggregate_monthly_repayments(true)?;
        let term_loan_monthly_repayments = cache.aggregate_monthly_repayments(false)?;
        let demand_loan_count = cache.loan_count(true);
        let term_loan_count = cache.loan_count(false);

        for (is_demand_loan, loan_count, series) in [
            (true, demand_loan_count, &demand_loan_monthly_series),
            (false, term_loan_count, &term_loan_monthly_series),
        ] {
            events.emit(Event::PortfolioAggregated {
                run_id,
                is_demand_loan,
                loan_count,
                total_outstanding: series.iter().sum(),
            });
        }

        info!(
            period = %period,
            loans = cache.len(),
            failed = failures.len(),
            "service charge inputs computed"
        );

        Ok(PeriodicChargeComputation {
            run_id,
            period,
            demand_loan_monthly_series,
            term_loan_monthly_series,
            demand_loan_monthly_repayments,
            term_loan_monthly_repayments,
            demand_loan_count,
            term_loan_count,
            total_outstanding_amount,
            summaries: cache.summaries().into_iter().cloned().collect(),
            failures,
            events: events.take_events(),
        })
    }
}

/// compute month-wise demand and term loan balances for the configured period
pub fn compute_periodic_charge<R: RepaymentReader>(
    loans: &[LoanSnapshot],
    products: &[LoanProductSnapshot],
    config: &ServiceChargeConfig,
    reader: &R,
    time_provider: &SafeTimeProvider,
) -> Result<PeriodicChargeComputation> {
    ServiceChargeCalculator::new(config.clone()).compute(loans, products, reader, time_provider)
}
