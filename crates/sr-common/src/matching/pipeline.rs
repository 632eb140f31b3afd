use std::{cmp::Ordering, collections::HashMap};

use super::{
    ko_checks::run_all_ko_checks,
    ko_unified::KnockoutResultV2,
    prefilter::{EnhancedPreFilter, PreFilterConfig, PrefilterCandidate},
    scoring::{
        MatchScore, MatchingConfig, calculate_detailed_score, calculate_total_score_with_two_tower,
    },
};
use crate::{
    Project, Talent,
    db::interaction_logs::InteractionLogInsert,
    two_tower::{TwoTowerConfig, TwoTowerEmbedder, create_embedder, load_config_from_env},
};

#[derive(Debug, Clone)]
pub struct RankedMatch {
    pub project: Project,
    pub ko: KnockoutResultV2,
    pub prefilter_score: MatchScore,
    pub detailed_score: MatchScore,
}

#[derive(Debug, Clone)]
pub struct RankedTalentMatch {
    pub talent: Talent,
    pub project: Project,
    pub ko: KnockoutResultV2,
    pub prefilter_score: MatchScore,
    pub detailed_score: MatchScore,
    pub total_score: f64,
    pub two_tower_score: Option<f32>,
    pub two_tower_embedder: Option<String>,
    pub two_tower_version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MatchingEngineConfig {
    pub prefilter: PreFilterConfig,
}

impl Default for MatchingEngineConfig {
    fn default() -> Self {
        Self {
            prefilter: PreFilterConfig::default(),
        }
    }
}

pub struct MatchingEngine {
    prefilter: EnhancedPreFilter,
}

impl MatchingEngine {
    pub fn new(config: MatchingEngineConfig) -> Self {
        Self {
            prefilter: EnhancedPreFilter::new(config.prefilter),
        }
    }

    pub fn default() -> Self {
        Self::new(MatchingEngineConfig::default())
    }

    /// Prefilter で粗選別した上で詳細スコアを再計算し、総合スコア順に並べる
    pub fn rank_projects(&self, talent: &Talent, projects: &[Project]) -> Vec<RankedMatch> {
        let candidates = self.prefilter.filter_candidates(talent, projects);

        let mut ranked: Vec<_> = candidates
            .into_iter()
            .map(|candidate| self.build_ranked_match(talent, candidate))
            .collect();

        ranked.sort_by(|a, b| {
            match b
                .detailed_score
                .total
                .partial_cmp(&a.detailed_score.total)
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Equal => Ordering::Equal,
                other => other,
            }
        });

        ranked
    }

    fn build_ranked_match(&self, talent: &Talent, candidate: PrefilterCandidate) -> RankedMatch {
        let detailed_score = calculate_detailed_score(&candidate.project, talent);

        RankedMatch {
            project: candidate.project,
            ko: candidate.ko,
            prefilter_score: candidate.match_score,
            detailed_score,
        }
    }

    /// KO 判定のみを先に確認したい場合のユーティリティ
    pub fn evaluate_ko(&self, project: &Project, talent: &Talent) -> KnockoutResultV2 {
        run_all_ko_checks(project, talent)
    }

    /// Prefilter + detailed score に加えて Two-Tower 類似度を組み合わせ、案件に対する人材をランキングする
    pub fn rank_talents_for_project(
        &self,
        project: &Project,
        talents: &[Talent],
        two_tower: Option<&dyn TwoTowerEmbedder>,
        two_tower_config: &TwoTowerConfig,
    ) -> Vec<RankedTalentMatch> {
        let mut two_tower_scores: HashMap<i64, f32> = HashMap::new();
        let mut embedder_meta: Option<(&'static str, String)> = None;

        if let Some(embedder) = two_tower {
            embedder_meta = Some((embedder.name(), embedder.version().to_string()));
            for (talent_id, score) in embedder.rank_talents(project, talents) {
                two_tower_scores.insert(talent_id, score);
            }
        }

        let total_weights = MatchingConfig::detailed().total_score_weights;
        let mut ranked = Vec::new();

        for talent in talents {
            let Some(candidate) = self.prefilter.evaluate_candidate(talent, project) else {
                continue;
            };

            let detailed_score = calculate_detailed_score(project, talent);
            let business_score = detailed_score.total;
            let tt_score = talent.id.and_then(|id| two_tower_scores.get(&id).cloned());

            let total_score = calculate_total_score_with_two_tower(
                business_score,
                0.0,
                0.0,
                tt_score,
                &total_weights,
                two_tower_config,
            );

            ranked.push(RankedTalentMatch {
                talent: talent.clone(),
                project: candidate.project,
                ko: candidate.ko,
                prefilter_score: candidate.match_score,
                detailed_score,
                total_score,
                two_tower_score: tt_score,
                two_tower_embedder: embedder_meta.as_ref().map(|m| m.0.to_string()),
                two_tower_version: embedder_meta.as_ref().map(|m| m.1.clone()),
            });
        }

        ranked.sort_by(|a, b| {
            match b
                .total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Equal => Ordering::Equal,
                other => other,
            }
        });

        ranked
    }
}

impl RankedTalentMatch {
    /// interaction_logs へ INSERT するためのレコードを組み立てる
    pub fn to_interaction_log(
        &self,
        match_run_id: impl Into<String>,
        match_result_id: Option<i64>,
        engine_version: Option<String>,
        config_version: Option<String>,
        variant: Option<String>,
    ) -> Option<InteractionLogInsert> {
        let talent_id = self.talent.id?;
        let project_id = self.project.id?;

        Some(InteractionLogInsert {
            match_result_id,
            talent_id,
            project_id,
            match_run_id: match_run_id.into(),
            engine_version,
            config_version,
            two_tower_score: self.two_tower_score.map(|v| v as f64),
            two_tower_embedder: self.two_tower_embedder.clone(),
            two_tower_version: self.two_tower_version.clone(),
            business_score: Some(self.detailed_score.total),
            outcome: None,
            feedback_at: None,
            variant,
            created_at: None,
        })
    }
}

/// 環境変数から Two-Tower を初期化するヘルパー。
/// enabled=false の場合は embedder を生成せず None を返す。
pub fn init_two_tower_from_env() -> (TwoTowerConfig, Option<Box<dyn TwoTowerEmbedder>>) {
    let config = load_config_from_env();
    if !config.enabled {
        return (config, None);
    }

    let embedder_name = std::env::var("TWO_TOWER_EMBEDDER").unwrap_or_else(|_| "hash".into());
    let embedder = create_embedder(&embedder_name, config.clone());
    (config, Some(embedder))
}
