// ==========================================
// 车队 TCO 分析系统 - 可靠性模型
// ==========================================
// 职责: Weibull 失效曲线、特征寿命、更换间隔搜索、按年更换计划
// 输入: 部件平均寿命 + 形状参数
// 输出: FailureCurve / ReplacementInterval / ReliabilityScheduleYear
// ==========================================
// 红线: 形状或寿命 <= 0 立即返回域错误, 不得产生 NaN/Infinity
// ==========================================

use crate::config::EngineConfig;
use crate::domain::component::ComponentLifecycle;
use crate::domain::price::PriceCatalog;
use crate::domain::result::{
    ComponentReliability, CurvePoint, DueReplacement, FailureCurve, ReliabilityScheduleYear,
    ReplacementInterval, WeibullParameters,
};
use crate::engine::error::{EngineError, EngineResult};
use std::f64::consts::PI;

// ==========================================
// Gamma 函数 (Lanczos 近似, g=7, n=9)
// ==========================================
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Γ(x), x < 0.5 时使用反射公式 Γ(x)Γ(1-x) = π / sin(πx)
pub fn gamma(x: f64) -> f64 {
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    let x = x - 1.0;
    let mut a = LANCZOS_COEFFICIENTS[0];
    let t = x + LANCZOS_G + 0.5;
    for (i, coefficient) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        a += coefficient / (x + i as f64);
    }

    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
}

// ==========================================
// WeibullDistribution - 两参数 Weibull 分布
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeibullDistribution {
    pub shape: f64,
    pub scale: f64,
}

impl WeibullDistribution {
    /// 由平均寿命推导尺度: η = mean / Γ(1 + 1/β)
    pub fn from_mean_life(mean_life_hours: f64, shape: f64) -> EngineResult<Self> {
        ensure_positive("mean_life_hours", mean_life_hours)?;
        ensure_positive("shape", shape)?;

        let scale = mean_life_hours / gamma(1.0 + 1.0 / shape);
        ensure_positive("scale", scale)?;
        Ok(Self { shape, scale })
    }

    pub fn from_scale(scale: f64, shape: f64) -> EngineResult<Self> {
        ensure_positive("scale", scale)?;
        ensure_positive("shape", shape)?;
        Ok(Self { shape, scale })
    }

    /// 累计失效概率 F(t) = 1 - exp(-(t/η)^β)
    pub fn cdf(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        1.0 - (-(t / self.scale).powf(self.shape)).exp()
    }

    /// 可靠度 R(t) = exp(-(t/η)^β)
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// 概率密度 f(t) = (β/η)(t/η)^(β-1) exp(-(t/η)^β), 仅 t > 0
    pub fn density(&self, t: f64) -> f64 {
        let z = t / self.scale;
        (self.shape / self.scale) * z.powf(self.shape - 1.0) * (-z.powf(self.shape)).exp()
    }

    pub fn mean(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// 累计失效达到 p 的时刻: η (-ln(1-p))^(1/β)
    pub fn life_at(&self, p: f64) -> f64 {
        self.scale * (-(1.0 - p).ln()).powf(1.0 / self.shape)
    }

    pub fn b10(&self) -> f64 {
        self.life_at(0.10)
    }

    pub fn b50(&self) -> f64 {
        self.life_at(0.50)
    }

    pub fn parameters(&self) -> WeibullParameters {
        WeibullParameters {
            shape: self.shape,
            scale: self.scale,
            mean_life_hours: self.mean(),
            b10_life_hours: self.b10(),
            b50_life_hours: self.b50(),
        }
    }
}

fn ensure_positive(parameter: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidWeibull {
            parameter: parameter.to_string(),
            value,
        })
    }
}

/// 截至 hours 为止发生的更换次数; 恰好落在分析期末的更换不计入
pub(crate) fn replacements_through(hours: f64, life_hours: f64, horizon_hours: f64) -> u32 {
    if life_hours <= 0.0 || hours <= 0.0 {
        return 0;
    }
    if hours >= horizon_hours {
        let n = (horizon_hours / life_hours).ceil();
        return (n - 1.0).max(0.0) as u32;
    }
    (hours / life_hours).floor() as u32
}

// ==========================================
// ReliabilityModel - 可靠性模型
// ==========================================
pub struct ReliabilityModel {
    // 无状态引擎
}

impl ReliabilityModel {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 失效曲线
    // ==========================================

    /// 生成失效曲线: 在 [0, 2×mean] 上采样 points+1 个点
    ///
    /// # 参数
    /// - `mean_life_hours`: 平均寿命 (运行小时)
    /// - `shape`: Weibull 形状参数 β
    /// - `points`: 采样区间数
    pub fn failure_curve(
        &self,
        mean_life_hours: f64,
        shape: f64,
        points: u32,
    ) -> EngineResult<FailureCurve> {
        let dist = WeibullDistribution::from_mean_life(mean_life_hours, shape)?;
        Ok(self.sample_curve(&dist, mean_life_hours, points))
    }

    /// 使用显式尺度参数生成失效曲线
    pub fn failure_curve_with_scale(
        &self,
        scale: f64,
        shape: f64,
        points: u32,
    ) -> EngineResult<FailureCurve> {
        let dist = WeibullDistribution::from_scale(scale, shape)?;
        let mean = dist.mean();
        Ok(self.sample_curve(&dist, mean, points))
    }

    fn sample_curve(
        &self,
        dist: &WeibullDistribution,
        mean_life_hours: f64,
        points: u32,
    ) -> FailureCurve {
        let points = points.max(1);
        let step = 2.0 * mean_life_hours / points as f64;

        let curve = (0..=points)
            .map(|i| {
                let t = step * i as f64;
                let failure_rate = if i == 0 {
                    self.density_at_origin(dist, step)
                } else {
                    dist.density(t)
                };
                CurvePoint {
                    hours: t,
                    failure_probability: dist.cdf(t),
                    reliability: dist.reliability(t),
                    failure_rate,
                }
            })
            .collect();

        FailureCurve {
            curve,
            parameters: dist.parameters(),
        }
    }

    /// t=0 处的密度: β>1 为 0, β=1 为 1/η, β<1 时取首个采样区间的平均密度
    fn density_at_origin(&self, dist: &WeibullDistribution, step: f64) -> f64 {
        if dist.shape > 1.0 {
            0.0
        } else if dist.shape == 1.0 {
            1.0 / dist.scale
        } else {
            dist.cdf(step) / step
        }
    }

    // ==========================================
    // 更换间隔搜索
    // ==========================================

    /// 离散搜索 [0, 1.5×mean] 内单位时间期望成本最低的更换间隔
    ///
    /// 成本率 = (c·R(t) + k·c·F(t)) / (t·R(t) + (t/2)·F(t))
    ///
    /// 分母中失效分支取 t/2 是局部近似, 不是更新过程的精确期望周期长度。
    /// 结果只能作为方向性参考。
    pub fn optimal_replacement_interval(
        &self,
        mean_life_hours: f64,
        shape: f64,
        planned_cost: f64,
        unplanned_multiplier: f64,
        steps: u32,
    ) -> EngineResult<ReplacementInterval> {
        let dist = WeibullDistribution::from_mean_life(mean_life_hours, shape)?;
        self.search_interval(&dist, mean_life_hours, planned_cost, unplanned_multiplier, steps)
    }

    fn search_interval(
        &self,
        dist: &WeibullDistribution,
        mean_life_hours: f64,
        planned_cost: f64,
        unplanned_multiplier: f64,
        steps: u32,
    ) -> EngineResult<ReplacementInterval> {
        if !(planned_cost.is_finite() && planned_cost >= 0.0) {
            return Err(EngineError::invalid_parameter(
                "planned_cost",
                format!("必须为非负有限值, 实际 {}", planned_cost),
            ));
        }
        if !(unplanned_multiplier.is_finite() && unplanned_multiplier >= 0.0) {
            return Err(EngineError::invalid_parameter(
                "unplanned_multiplier",
                format!("必须为非负有限值, 实际 {}", unplanned_multiplier),
            ));
        }

        let steps = steps.max(crate::config::MIN_INTERVAL_SEARCH_STEPS);
        let upper = 1.5 * mean_life_hours;

        let mut best_t = upper;
        let mut best_rate = f64::INFINITY;

        for i in 1..=steps {
            let t = upper * i as f64 / steps as f64;
            let r = dist.reliability(t);
            let f = dist.cdf(t);

            let expected_cost = planned_cost * r + unplanned_multiplier * planned_cost * f;
            let expected_cycle = t * r + (t / 2.0) * f;
            if expected_cycle <= 0.0 {
                continue;
            }

            let rate = expected_cost / expected_cycle;
            if rate < best_rate {
                best_rate = rate;
                best_t = t;
            }
        }

        Ok(ReplacementInterval {
            optimal_interval_hours: best_t,
            cost_per_hour: if best_rate.is_finite() { best_rate } else { 0.0 },
            pct_of_oem_life: best_t / mean_life_hours * 100.0,
            is_heuristic: true,
        })
    }

    // ==========================================
    // 部件可靠性汇总
    // ==========================================

    /// 单个部件的 Weibull 参数与启发式更换间隔
    ///
    /// 显式尺度优先, 否则由平均寿命与形状推导
    pub fn component_summary(
        &self,
        component: &ComponentLifecycle,
        planned_cost: f64,
        config: &EngineConfig,
    ) -> EngineResult<ComponentReliability> {
        let shape = component.shape_or(config.default_weibull_shape);
        ensure_positive("mean_life_hours", component.mean_life_hours)?;

        let dist = match component.weibull_scale {
            Some(scale) => WeibullDistribution::from_scale(scale, shape)?,
            None => WeibullDistribution::from_mean_life(component.mean_life_hours, shape)?,
        };

        let replacement_interval = self.search_interval(
            &dist,
            component.mean_life_hours,
            planned_cost,
            config.unplanned_cost_multiplier,
            config.effective_search_steps(),
        )?;

        Ok(ComponentReliability {
            component_id: component.component_id.clone(),
            component_name: component.component_name.clone(),
            equipment_model_id: component.equipment_model_id.clone(),
            parameters: dist.parameters(),
            planned_cost,
            replacement_interval,
        })
    }

    // ==========================================
    // 按年更换计划
    // ==========================================

    /// 逐年累计运行小时, 每当 floor(累计小时 / 寿命) 增加即记一次更换
    ///
    /// 单次成本 = 备件价格 (可解析时) + 更换工时 × 费率, 乘以台数
    pub fn replacement_schedule(
        &self,
        components: &[ComponentLifecycle],
        total_units: u32,
        avg_annual_hours: f64,
        period_years: u32,
        labor_rate: f64,
        catalog: &PriceCatalog,
    ) -> EngineResult<Vec<ReliabilityScheduleYear>> {
        for component in components {
            ensure_positive("mean_life_hours", component.mean_life_hours)?;
        }

        let horizon_hours = avg_annual_hours * period_years as f64;
        let mut schedule = Vec::with_capacity(period_years as usize);

        for year in 1..=period_years {
            let cumulative_hours = avg_annual_hours * year as f64;
            let prior_hours = avg_annual_hours * (year - 1) as f64;

            let replacements: Vec<DueReplacement> = components
                .iter()
                .filter_map(|component| {
                    let life = component.mean_life_hours;
                    let now = replacements_through(cumulative_hours, life, horizon_hours);
                    let before = replacements_through(prior_hours, life, horizon_hours);
                    if now <= before {
                        return None;
                    }

                    let events = now - before;
                    let part_cost = component
                        .part_number
                        .as_deref()
                        .and_then(|pn| catalog.unit_price(pn))
                        .unwrap_or(0.0);
                    let per_event = part_cost + component.replacement_labor_hours * labor_rate;

                    Some(DueReplacement {
                        component_id: component.component_id.clone(),
                        component_name: component.component_name.clone(),
                        replacement_number: now,
                        events_in_year: events,
                        units: total_units,
                        cost: per_event * events as f64 * total_units as f64,
                    })
                })
                .collect();

            let total_cost = replacements.iter().map(|r| r.cost).sum();
            schedule.push(ReliabilityScheduleYear {
                year,
                cumulative_hours,
                replacements,
                total_cost,
            });
        }

        Ok(schedule)
    }
}

impl Default for ReliabilityModel {
    fn default() -> Self {
        Self::new()
    }
}
